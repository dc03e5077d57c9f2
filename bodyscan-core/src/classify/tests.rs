//! Boundary tests for the metric classifiers

#[cfg(test)]
mod classify_tests {
    use crate::classify::*;
    use crate::patient::Gender;

    fn bmi(value: f64) -> (String, Severity) {
        let s = classify_bmi(value);
        (s.category, s.severity)
    }

    fn category(s: StatusDescriptor) -> String {
        s.category
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Normal < Severity::Elevated);
        assert!(Severity::Elevated < Severity::Risk);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Normal.color(), "#22c55e");
        assert_eq!(Severity::Elevated.color(), "#f97316");
        assert_eq!(Severity::Risk.color(), "#ef4444");
    }

    #[test]
    fn test_bmi_band_boundaries() {
        let cases = [
            (17.999, "Malnutrition 2", Severity::Risk),
            (18.0, "Malnutrition 1", Severity::Elevated),
            (19.999, "Malnutrition 1", Severity::Elevated),
            (20.0, "Normal", Severity::Normal),
            (22.999, "Normal", Severity::Normal),
            (23.0, "Overweight", Severity::Elevated),
            (24.999, "Overweight", Severity::Elevated),
            (25.0, "Obesity grade 1", Severity::Elevated),
            (27.999, "Obesity grade 1", Severity::Elevated),
            (28.0, "Obesity grade 2", Severity::Risk),
            (29.999, "Obesity grade 2", Severity::Risk),
            (30.0, "Obesity grade 3", Severity::Risk),
        ];
        for (value, expected, severity) in cases {
            assert_eq!(
                bmi(value),
                (expected.to_string(), severity),
                "BMI {} should be {}",
                value,
                expected
            );
        }
    }

    #[test]
    fn test_bmi_extreme_inputs() {
        assert_eq!(bmi(-5.0).0, "Malnutrition 2");
        assert_eq!(bmi(0.0).0, "Malnutrition 2");
        assert_eq!(bmi(f64::NEG_INFINITY).0, "Malnutrition 2");
        assert_eq!(bmi(1e300).0, "Obesity grade 3");
        assert_eq!(bmi(f64::INFINITY).0, "Obesity grade 3");
        // NaN fails every comparison and falls through to the last band
        assert_eq!(bmi(f64::NAN).0, "Obesity grade 3");
    }

    #[test]
    fn test_bmi_details_carry_health_risks() {
        assert!(classify_bmi(24.0).details.starts_with("Fatigue"));
        assert!(classify_bmi(35.0).details.contains("Maximum risk"));
    }

    #[test]
    fn test_body_fat_male_boundaries() {
        let cases = [
            (9.999, "Risk"),
            (10.0, "Normal"),
            (20.0, "Normal"),
            (20.5, "Risk"),
            (21.0, "High"),
            (25.0, "High"),
            (25.001, "Risk"),
            (-1.0, "Risk"),
        ];
        for (value, expected) in cases {
            assert_eq!(
                category(classify_body_fat(value, Gender::Male)),
                expected,
                "male body fat {}",
                value
            );
        }
    }

    #[test]
    fn test_body_fat_female_boundaries() {
        let cases = [
            (19.999, "Risk"),
            (20.0, "Normal"),
            (30.0, "Normal"),
            (30.5, "Risk"),
            (31.0, "High"),
            (35.0, "High"),
            (35.001, "Risk"),
        ];
        for (value, expected) in cases {
            assert_eq!(
                category(classify_body_fat(value, Gender::Female)),
                expected,
                "female body fat {}",
                value
            );
        }
    }

    #[test]
    fn test_body_fat_tables_do_not_cross() {
        let male = classify_body_fat(22.0, Gender::Male);
        let female = classify_body_fat(22.0, Gender::Female);
        assert_eq!(male.category, "High");
        assert_eq!(male.severity, Severity::Elevated);
        assert_eq!(female.category, "Normal");
        assert_eq!(female.severity, Severity::Normal);
        assert!(male.details.contains("10-20%"));
        assert!(female.details.contains("20-30%"));
    }

    #[test]
    fn test_visceral_fat_boundaries() {
        let cases = [
            (1.999, "Risk", Severity::Risk),
            (2.0, "Normal", Severity::Normal),
            (8.0, "Normal", Severity::Normal),
            (8.5, "Risk", Severity::Risk),
            (9.0, "High", Severity::Elevated),
            (14.0, "High", Severity::Elevated),
            (14.001, "Risk", Severity::Risk),
            (f64::NAN, "Risk", Severity::Risk),
        ];
        for (value, expected, severity) in cases {
            let status = classify_visceral_fat(value);
            assert_eq!(status.category, expected, "visceral fat {}", value);
            assert_eq!(status.severity, severity);
        }
    }

    #[test]
    fn test_subcutaneous_fat_boundaries() {
        assert_eq!(category(classify_subcutaneous_fat(14.999)), "Normal");
        assert_eq!(category(classify_subcutaneous_fat(-3.0)), "Normal");
        assert_eq!(category(classify_subcutaneous_fat(15.0)), "High");
        assert_eq!(
            classify_subcutaneous_fat(40.0).severity,
            Severity::Elevated
        );
    }

    #[test]
    fn test_skeletal_muscle_boundaries() {
        let male = [
            (32.999, "Abnormal"),
            (33.0, "Normal"),
            (36.0, "Normal"),
            (36.001, "Abnormal"),
        ];
        for (value, expected) in male {
            assert_eq!(
                category(classify_skeletal_muscle(value, Gender::Male)),
                expected,
                "male skeletal muscle {}",
                value
            );
        }
        let female = [
            (29.999, "Abnormal"),
            (30.0, "Normal"),
            (33.0, "Normal"),
            (33.001, "Abnormal"),
        ];
        for (value, expected) in female {
            assert_eq!(
                category(classify_skeletal_muscle(value, Gender::Female)),
                expected,
                "female skeletal muscle {}",
                value
            );
        }
        assert_eq!(
            classify_skeletal_muscle(50.0, Gender::Male).severity,
            Severity::Elevated
        );
    }

    #[test]
    fn test_bmr_symmetric_around_expected() {
        // +-10% of 1800
        assert_eq!(category(classify_bmr(1980.0, Gender::Male)), "Normal");
        assert_eq!(category(classify_bmr(1620.0, Gender::Male)), "Normal");
        assert_eq!(category(classify_bmr(1800.0, Gender::Male)), "Normal");
        // +-20% of 1800
        assert_eq!(
            category(classify_bmr(2160.0, Gender::Male)),
            "Slightly Abnormal"
        );
        assert_eq!(
            category(classify_bmr(1440.0, Gender::Male)),
            "Slightly Abnormal"
        );
    }

    #[test]
    fn test_bmr_bands() {
        let slightly = classify_bmr(1800.0 * 1.19, Gender::Male);
        assert_eq!(slightly.category, "Slightly Abnormal");
        assert_eq!(slightly.severity, Severity::Elevated);

        let abnormal = classify_bmr(1800.0 * 1.25, Gender::Male);
        assert_eq!(abnormal.category, "Abnormal");
        assert_eq!(abnormal.severity, Severity::Risk);

        assert_eq!(category(classify_bmr(0.0, Gender::Male)), "Abnormal");
        assert_eq!(category(classify_bmr(-100.0, Gender::Female)), "Abnormal");
        assert_eq!(category(classify_bmr(f64::NAN, Gender::Female)), "Abnormal");
    }

    #[test]
    fn test_bmr_uses_gender_reference() {
        // 1900 is 18.75% over the female reference but 5.6% over the male one
        assert_eq!(category(classify_bmr(1760.0, Gender::Female)), "Normal");
        assert_eq!(
            category(classify_bmr(1900.0, Gender::Female)),
            "Slightly Abnormal"
        );
        assert_eq!(category(classify_bmr(1900.0, Gender::Male)), "Normal");
        assert!(classify_bmr(1600.0, Gender::Female)
            .details
            .contains("~1600 kcal/day"));
    }

    #[test]
    fn test_bmr_deviation_percent() {
        assert_eq!(bmr_deviation_percent(1500.0, Gender::Female), 6.25);
        assert_eq!(bmr_deviation_percent(1800.0, Gender::Male), 0.0);
    }

    #[test]
    fn test_body_age_comparison() {
        let equal = classify_body_age(34.0, 34.0);
        assert_eq!(equal.category, "Good");
        assert_eq!(equal.severity, Severity::Normal);

        let older = classify_body_age(35.0, 34.0);
        assert_eq!(older.category, "Needs Improvement");
        assert_eq!(older.severity, Severity::Elevated);

        assert_eq!(category(classify_body_age(20.0, 34.0)), "Good");
        assert!(equal.details.ends_with("of 34 years"));
    }

    #[test]
    fn test_jane_doe_statuses() {
        let record = crate::patient::tests::jane_doe();
        let statuses = classify_all(&record);
        let summary: Vec<(Metric, &str, Severity)> = statuses
            .iter()
            .map(|(m, s)| (*m, s.category.as_str(), s.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Metric::Bmi, "Overweight", Severity::Elevated),
                (Metric::BodyFat, "Normal", Severity::Normal),
                (Metric::VisceralFat, "High", Severity::Elevated),
                (Metric::SubcutaneousFat, "Normal", Severity::Normal),
                (Metric::SkeletalMuscle, "Normal", Severity::Normal),
                (Metric::Bmr, "Normal", Severity::Normal),
                (Metric::BodyAge, "Good", Severity::Normal),
            ]
        );
        assert_eq!(overall_severity(&statuses), Severity::Elevated);
    }

    #[test]
    fn test_overall_severity_empty() {
        assert_eq!(overall_severity(&[]), Severity::Normal);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(Metric::Bmi.format_value(24.0), "24.0");
        assert_eq!(Metric::Bmi.format_value(22.46), "22.5");
        assert_eq!(Metric::BodyFat.format_value(28.0), "28%");
        assert_eq!(Metric::SkeletalMuscle.format_value(31.5), "31.5%");
        assert_eq!(Metric::Bmr.format_value(1500.0), "1500");
        assert_eq!(Metric::VisceralFat.format_value(10.0), "10");
    }
}
