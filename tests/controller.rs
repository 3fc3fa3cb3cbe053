mod tests {
    use analog_rainbow::control::{
        AnalogController, ChangeDetection, ControllerConfig, ResponseProfile,
    };
    use analog_rainbow::error::{ConfigError, LockError, RootError};
    use analog_rainbow::math::Bisection;

    const PROFILES: [ResponseProfile; 5] = [
        ResponseProfile::Linear,
        ResponseProfile::Quadratic,
        ResponseProfile::Cubic,
        ResponseProfile::SymmetricCubic,
        ResponseProfile::SymmetricFifth,
    ];

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() <= tolerance
    }

    /// Linear 0..1 controller, unlocked with the knob at the center
    fn centered() -> AnalogController {
        let mut controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.5)).unwrap();
        assert!(controller.update(36_500).is_some());
        assert!(!controller.is_locked());
        controller
    }

    #[test]
    fn test_profile_shapes() {
        for profile in PROFILES {
            assert_eq!(profile.apply(0.0), 0.0, "{}", profile.as_str());
            assert_eq!(profile.apply(1.0), 1.0, "{}", profile.as_str());
        }
        assert_eq!(ResponseProfile::Linear.apply(0.5), 0.5);
        assert_eq!(ResponseProfile::Quadratic.apply(0.5), 0.25);
        assert_eq!(ResponseProfile::Cubic.apply(0.5), 0.125);
        assert_eq!(ResponseProfile::SymmetricCubic.apply(0.5), 0.5);
        assert_eq!(ResponseProfile::SymmetricCubic.apply(0.75), 0.5625);
        assert_eq!(ResponseProfile::SymmetricFifth.apply(0.75), 0.515_625);
    }

    #[test]
    fn test_profile_names() {
        for profile in PROFILES {
            assert_eq!(ResponseProfile::parse_from_str(profile.as_str()), Some(profile));
        }
        assert_eq!(
            ResponseProfile::parse_from_str("symmetric_fifth"),
            Some(ResponseProfile::SymmetricFifth)
        );
        assert_eq!(ResponseProfile::parse_from_str("symmetric_seventh"), None);
    }

    #[test]
    fn test_transform_clamps() {
        let controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(controller.transform(9_000.0), 0.0);
        assert_eq!(controller.transform(64_000.0), 1.0);
        assert_eq!(controller.transform(36_500.0), 0.5);
        assert_eq!(controller.transform(0.0), 0.0);
        assert_eq!(controller.transform(65_535.0), 1.0);

        let speed = AnalogController::new(
            ControllerConfig::new(-64.0, 64.0, 1.0).with_profile(ResponseProfile::SymmetricFifth),
        )
        .unwrap();
        assert_eq!(speed.transform(36_500.0), 0.0);
        assert_eq!(speed.transform(64_000.0), 64.0);
        assert_eq!(speed.transform(9_000.0), -64.0);
    }

    #[test]
    fn test_config_validation() {
        let empty = ControllerConfig::new(0.0, 1.0, 0.0).with_raw_range(100.0, 100.0);
        assert_eq!(AnalogController::new(empty).err(), Some(ConfigError::EmptyRawRange));

        let inverted = ControllerConfig::new(1.0, 0.0, 0.5);
        assert_eq!(
            AnalogController::new(inverted).err(),
            Some(ConfigError::InvalidOutputRange)
        );

        let outside = ControllerConfig::new(0.0, 1.0, 2.0);
        assert_eq!(
            AnalogController::new(outside).err(),
            Some(ConfigError::UnreachableInitialValue)
        );

        for window in [0, 17] {
            let config = ControllerConfig::new(0.0, 1.0, 0.0)
                .with_detection(ChangeDetection::MovingAverage { window });
            assert_eq!(
                AnalogController::new(config).err(),
                Some(ConfigError::InvalidWindow)
            );
        }
    }

    #[test]
    fn test_starts_locked_at_initial_value() {
        let controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.5)).unwrap();
        assert!(controller.is_locked());
        assert!(close(controller.value(), 0.5, 1e-3));
        assert!(close(controller.locked_raw(), 36_500.0, 2.0));
    }

    #[test]
    fn test_locked_controller_ignores_distant_knob() {
        let mut controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.5)).unwrap();
        assert_eq!(controller.update(60_000), None);
        assert_eq!(controller.update(9_000), None);
        assert!(controller.is_locked());
        assert!(close(controller.value(), 0.5, 1e-3));

        let value = controller.update(39_000).unwrap();
        assert!(!controller.is_locked());
        assert!(close(value, 30_000.0 / 55_000.0, 1e-6));
        assert!(close(controller.value(), value, 1e-6));
    }

    #[test]
    fn test_hysteresis_threshold() {
        let mut controller = centered();
        assert_eq!(controller.update(37_299), None);
        assert_eq!(controller.update(35_701), None);
        for jitter in [-399_i32, 0, 250, 399] {
            let raw = u16::try_from(36_500 + jitter).unwrap();
            assert_eq!(controller.update(raw), None);
        }

        let value = controller.update(37_300).unwrap();
        assert!(close(value, 28_300.0 / 55_000.0, 1e-6));

        // The baseline moved with the report
        assert_eq!(controller.update(36_600), None);
        assert!(controller.update(36_500).is_some());
    }

    #[test]
    fn test_moving_average_warmup_and_threshold() {
        let config = ControllerConfig::new(0.0, 1.0, 0.5)
            .with_detection(ChangeDetection::MovingAverage { window: 4 });
        let mut controller = AnalogController::new(config).unwrap();

        for _ in 0..3 {
            assert_eq!(controller.update(36_500), None);
        }
        assert!(controller.update(36_500).is_some());
        assert!(!controller.is_locked());

        assert_eq!(controller.update(37_500), None);
        assert_eq!(controller.update(37_500), None);
        assert_eq!(controller.update(37_500), None);
        let value = controller.update(37_500).unwrap();
        assert!(close(value, 28_500.0 / 55_000.0, 1e-6));
    }

    #[test]
    fn test_lock_returns_target_value() {
        let config =
            ControllerConfig::new(-64.0, 64.0, 1.0).with_profile(ResponseProfile::SymmetricFifth);
        let mut controller = AnalogController::new(config).unwrap();
        for target in [-64.0, -50.0, -1.0, 0.0, 0.2, 10.0, 63.0, 64.0] {
            controller.lock_at(target).unwrap();
            assert!(controller.is_locked());
            assert!(
                close(controller.value(), target, 0.05),
                "target {target}, got {}",
                controller.value()
            );
        }
    }

    #[test]
    fn test_lock_every_profile() {
        for profile in PROFILES {
            let mut controller =
                AnalogController::new(ControllerConfig::new(-16.0, 16.0, 0.0).with_profile(profile))
                    .unwrap();
            for target in [-15.0, -4.0, 0.5, 3.0, 12.0] {
                controller.lock_at(target).unwrap();
                assert!(close(controller.value(), target, 0.05), "{}", profile.as_str());
            }
        }
    }

    #[test]
    fn test_lock_keeps_last_reported_value() {
        let mut controller = centered();
        let reported = controller.update(39_000).unwrap();
        controller.lock().unwrap();
        assert!(controller.is_locked());
        assert!(close(controller.value(), reported, 1e-3));
        assert!(close(controller.locked_raw(), 39_000.0, 2.0));

        // The knob moved away while another mode was active
        assert_eq!(controller.update(20_000), None);
        assert!(close(controller.value(), reported, 1e-3));
    }

    #[test]
    fn test_unreachable_lock_keeps_previous_position() {
        let mut controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.5)).unwrap();
        let previous = controller.locked_raw();
        assert_eq!(
            controller.lock_at(2.0),
            Err(LockError(RootError::NoSignChange))
        );
        assert!(controller.is_locked());
        assert_eq!(controller.locked_raw(), previous);
        assert!(close(controller.value(), 0.5, 1e-3));
    }

    #[test]
    fn test_forced_unlock() {
        let mut controller = AnalogController::new(ControllerConfig::new(0.0, 1.0, 0.5)).unwrap();
        assert_eq!(controller.update(64_000), None);
        let value = controller.unlock();
        assert!(!controller.is_locked());
        assert_eq!(value, 1.0);
        assert_eq!(controller.value(), 1.0);
    }

    #[test]
    fn test_reset_returns_initial_value() {
        let mut controller = centered();
        controller.update(50_000);
        assert_eq!(controller.reset(), Ok(0.5));
        assert!(controller.is_locked());
        assert!(close(controller.value(), 0.5, 1e-3));
    }

    #[test]
    fn test_bisection() {
        let precise = Bisection {
            iterations: 100,
            tolerance: 1e-6,
        };
        let root = precise.solve(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!(close(root, 2.0_f32.sqrt(), 1e-5));
        assert_eq!(precise.solve(|x| x, 0.0, 1.0), Ok(0.0));
        assert_eq!(
            precise.solve(|x| x * x + 1.0, -1.0, 1.0),
            Err(RootError::NoSignChange)
        );

        let short = Bisection {
            iterations: 3,
            tolerance: 1e-9,
        };
        assert_eq!(short.solve(|x| x - 0.3, 0.0, 1.0), Err(RootError::NotConverged));
    }
}
