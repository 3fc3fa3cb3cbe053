mod tests {
    use analog_rainbow::color::{HueCurve, Rgb};
    use analog_rainbow::effect::{Effect, HueRange, RainbowAnimator, RainbowConfig};
    use analog_rainbow::error::ConfigError;
    use analog_rainbow::{Instant, Parameter};

    fn config(steps: usize, hue_range: HueRange, speed: f32, color_delta: f32) -> RainbowConfig {
        RainbowConfig {
            steps,
            saturation: 1.0,
            hue_range,
            speed,
            color_delta,
            curve: HueCurve::Linear,
        }
    }

    #[test]
    fn test_static_full_rainbow() {
        let mut animator =
            RainbowAnimator::<256>::new(&config(256, HueRange::FULL, 0.0, 1.0)).unwrap();
        assert!(animator.window().looped);
        assert_eq!(animator.window().steps, 256);

        let expected = [0, 26, 51, 77, 102, 128, 154, 179, 205, 230];
        let mut leds = [Rgb::default(); 10];
        for _ in 0..5 {
            let indices: Vec<usize> = (0..10).map(|i| animator.index_at(i, 10)).collect();
            assert_eq!(indices, expected);
            animator.update(&mut leds);
            for (i, led) in leds.iter().enumerate() {
                assert_eq!(*led, animator.table().get(expected[i]));
            }
        }
        assert_eq!(animator.base_index(), 0);
    }

    #[test]
    fn test_bounce_walks_forward_then_back() {
        let mut animator =
            RainbowAnimator::<16>::new(&config(16, HueRange::new(0.0, 0.5), 20.0, 0.0)).unwrap();
        let window = animator.window();
        assert!(!window.looped);
        assert_eq!(window.lower, 0);
        assert_eq!(window.steps, 8);

        let mut leds = [Rgb::default(); 10];
        let mut history = Vec::new();
        for _ in 0..100 {
            let index = animator.index_at(0, 10);
            for i in 1..10 {
                assert_eq!(animator.index_at(i, 10), index);
            }
            history.push(index);
            animator.update(&mut leds);
        }

        assert!(history.iter().all(|&index| index <= 8));
        assert_eq!(history.iter().max(), Some(&8));
        for pair in history.windows(2) {
            assert!(pair[0].abs_diff(pair[1]) <= 1);
        }

        let top = history.iter().position(|&index| index == 8).unwrap();
        let next = history[top..].iter().find(|&&index| index != 8).unwrap();
        assert_eq!(*next, 7);
        assert!(history[top..].contains(&0));
    }

    #[test]
    fn test_bounce_stays_inside_window() {
        let mut animator =
            RainbowAnimator::<100>::new(&config(100, HueRange::new(0.2, 0.3), 45.0, 2.5)).unwrap();
        let window = animator.window();
        assert_eq!((window.lower, window.steps), (20, 30));

        let mut leds = [Rgb::default(); 30];
        for _ in 0..200 {
            for i in 0..30 {
                let index = animator.index_at(i, 30);
                assert!((20..=50).contains(&index), "index {index} outside window");
            }
            animator.update(&mut leds);
        }
    }

    #[test]
    fn test_loop_is_periodic_in_table_steps() {
        let mut animator =
            RainbowAnimator::<64>::new(&config(64, HueRange::FULL, 30.0, 1.0)).unwrap();
        let mut leds = [Rgb::default(); 64];
        for _ in 0..10 {
            for i in 0..64 {
                assert_eq!(animator.index_at(i, 64), animator.index_at(i + 64, 64));
            }
            animator.update(&mut leds);
        }
    }

    #[test]
    fn test_speed_accumulator_stays_fractional() {
        let mut animator =
            RainbowAnimator::<512>::new(&config(500, HueRange::new(0.1, 0.7), 37.3, 1.5))
                .unwrap();
        let mut leds = [Rgb::default(); 20];
        for speed in [37.3, 0.4, -3.0, -250.0, 1000.0] {
            animator.set_speed(speed);
            for _ in 0..50 {
                animator.update(&mut leds);
                let acc = animator.speed_accumulator();
                assert!((0.0..1.0).contains(&acc), "accumulator {acc}");
                assert!(animator.base_index() < 2 * animator.window().steps);
            }
        }
    }

    #[test]
    fn test_speed_sign_sets_direction() {
        let mut leds = [Rgb::default(); 4];

        let mut forward =
            RainbowAnimator::<64>::new(&config(64, HueRange::new(0.0, 0.5), 20.0, 1.0)).unwrap();
        forward.update(&mut leds);
        assert_eq!(forward.base_index(), 3);
        forward.update(&mut leds);
        assert_eq!(forward.base_index(), 6);

        let mut backward =
            RainbowAnimator::<64>::new(&config(64, HueRange::new(0.0, 0.5), -20.0, 1.0)).unwrap();
        assert!(backward.normalized_speed() > 32.0);
        backward.update(&mut leds);
        assert_eq!(backward.base_index(), 60);
        backward.update(&mut leds);
        assert_eq!(backward.base_index(), 57);
    }

    #[test]
    fn test_zero_speed_does_not_move() {
        let mut animator =
            RainbowAnimator::<64>::new(&config(64, HueRange::new(0.0, 0.5), 0.0, 1.0)).unwrap();
        assert_eq!(animator.normalized_speed(), 0.0);
        let mut leds = [Rgb::default(); 4];
        for _ in 0..10 {
            animator.update(&mut leds);
        }
        assert_eq!(animator.base_index(), 0);
    }

    #[test]
    fn test_set_steps_rederives_window() {
        let mut animator =
            RainbowAnimator::<256>::new(&config(100, HueRange::new(0.25, 0.5), 5.0, 1.0)).unwrap();
        let window = animator.window();
        assert_eq!((window.lower, window.steps), (25, 50));

        let window = animator.set_steps(200).unwrap();
        assert_eq!((window.lower, window.steps), (50, 100));
        assert_eq!(animator.steps(), 200);
        assert_eq!(animator.table().steps(), 200);

        assert_eq!(animator.set_steps(0), Err(ConfigError::ZeroSteps));
        assert!(matches!(
            animator.set_steps(257),
            Err(ConfigError::StepsExceedCapacity { .. })
        ));
        assert_eq!(animator.steps(), 200);
    }

    #[test]
    fn test_hue_window_is_at_least_one_step() {
        let mut animator =
            RainbowAnimator::<64>::new(&config(64, HueRange::FULL, 5.0, 1.0)).unwrap();
        let window = animator.set_hue_range(0.5, 0.0);
        assert_eq!(window.steps, 1);
        assert!(!window.looped);

        let mut leds = [Rgb::default(); 8];
        animator.update(&mut leds);
        for i in 0..8 {
            assert!((32..=33).contains(&animator.index_at(i, 8)));
        }
    }

    #[test]
    fn test_saturation_is_quantized() {
        let mut animator =
            RainbowAnimator::<32>::new(&config(32, HueRange::FULL, 0.0, 1.0)).unwrap();
        assert!(!animator.set_saturation(1.0));
        assert!(!animator.set_saturation(0.99));
        assert!(animator.set_saturation(0.0));
        assert!(!animator.set_saturation(0.01));
        assert_eq!(animator.saturation(), 0.0);

        let white = Rgb::new(255, 255, 255);
        assert!(animator.table().as_slice().iter().all(|&color| color == white));
    }

    #[test]
    fn test_effect_parameters() {
        let mut animator =
            RainbowAnimator::<128>::new(&config(128, HueRange::FULL, 0.0, 1.0)).unwrap();

        animator.apply(Parameter::Steps, 64.4);
        assert_eq!(animator.steps(), 64);
        animator.apply(Parameter::Steps, 1000.0);
        assert_eq!(animator.steps(), 128);
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            animator.apply(Parameter::Steps, value);
            assert_eq!(animator.steps(), 128);
        }

        animator.apply(Parameter::HueLower, 0.25);
        animator.apply(Parameter::HueSpan, 0.5);
        assert_eq!(animator.hue_range(), HueRange::new(0.25, 0.5));
        assert_eq!(animator.window().lower, 32);
        assert_eq!(animator.window().steps, 64);

        animator.apply(Parameter::ColorDelta, -2.0);
        assert_eq!(animator.color_delta(), -2.0);

        animator.apply(Parameter::Speed, 12.0);
        assert_eq!(animator.speed(), 12.0);

        let mut leds = [Rgb::default(); 8];
        animator.render(Instant::from_millis(0), &mut leds);
        assert!(animator.base_index() > 0);
        Effect::reset(&mut animator);
        assert_eq!(animator.base_index(), 0);
    }
}
