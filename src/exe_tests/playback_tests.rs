#[cfg(test)]
mod playback_tests
{
    use std::sync::Arc;
    use std::time::Duration;
    use approx::assert_abs_diff_eq;
    use math_signa::{EulerAngles, Transform};
    use nab_signa::timing::{FSeconds, TimeNanos};
    use rig_signa::frame_scheduler::ScheduleEvent;
    use rig_signa::keypoints::parse_frames;
    use rig_signa::{Avatar, BoneSample, FrameScheduler, FrameSlot, KeypointFrame, KeypointLibrary, Playback, PlaybackStatus, RetargetConfig};
    use world_signa::Scene;

    const MS: TimeNanos = 1_000_000;
    const RENDER_PERIOD: TimeNanos = 16 * MS;

    fn rig() -> Scene
    {
        let mut scene = Scene::with_native_names();
        let hips = scene.add_node("Hips", true, Transform::IDENTITY, None);
        let spine = scene.add_node("Spine", true, Transform::IDENTITY, Some(hips));
        let neck = scene.add_node("Neck", true, Transform::IDENTITY, Some(spine));
        scene.add_node("Head", true, Transform::IDENTITY, Some(neck));
        scene.add_node("RightHand", true, Transform::IDENTITY, Some(spine));
        scene
    }

    // Frames tagged by the bone they drive, so a reader can tell them apart
    fn tagged_frames(tag: &str, count: usize) -> Vec<KeypointFrame>
    {
        (0..count).map(|i| KeypointFrame::new()
            .with_bone(format!("{tag}{i}"), BoneSample::rotation(0.0, 0.0, 0.0))
            .with_bone("Head", BoneSample::rotation(0.1 * i as f32, 0.0, 0.0)))
            .collect()
    }

    fn tag_of(frame: &KeypointFrame) -> String
    {
        frame.iter().next().map(|(name, _)| name.to_string()).unwrap_or_default()
    }

    struct Harness
    {
        avatar: Avatar,
        slot: FrameSlot,
        playback: Playback,
        now: TimeNanos,
    }
    impl Harness
    {
        fn new() -> Self
        {
            let config = RetargetConfig::default();
            let slot = FrameSlot::new();
            Self
            {
                avatar: Avatar::from_config(rig(), &config),
                playback: Playback::new(FrameScheduler::new(slot.clone(), config.playback.frame_period())),
                slot,
                now: 0,
            }
        }

        // One render tick: advance playback, then pose from whatever frame is current
        fn render(&mut self) -> (ScheduleEvent, Option<Arc<KeypointFrame>>)
        {
            self.now += RENDER_PERIOD;
            let event = self.playback.tick(self.now);
            let frame = self.slot.load();
            self.avatar.update(frame.as_deref(), FSeconds(self.now as f32 / 1e9));
            (event, frame)
        }

        // Render until playback finishes, returning the distinct frames seen in order
        fn render_to_end(&mut self) -> Vec<String>
        {
            let mut seen: Vec<String> = Vec::new();
            for _ in 0..10_000
            {
                let (event, frame) = self.render();
                if let Some(tag) = frame.as_deref().map(tag_of)
                {
                    if seen.last() != Some(&tag) { seen.push(tag); }
                }
                if event == ScheduleEvent::Finished { return seen; }
            }
            panic!("playback never finished");
        }

        fn local(&self, name: &str) -> Transform
        {
            let node = self.avatar.scene().native_node(name).unwrap();
            self.avatar.scene().node(node).unwrap().local
        }
    }

    #[test]
    fn plays_every_frame_once()
    {
        let mut harness = Harness::new();
        harness.playback.request("merci", Ok(tagged_frames("A", 6)), harness.now);
        assert_eq!(harness.playback.status(), &PlaybackStatus::Playing("merci".into()));

        let seen = harness.render_to_end();
        assert_eq!(seen, ["A0", "A1", "A2", "A3", "A4", "A5"]);
        assert_eq!(harness.slot.writes(), 6);
        assert_eq!(harness.playback.status(), &PlaybackStatus::Finished);

        // the last pose is held
        let held = harness.local("Head");
        for _ in 0..10 { harness.render(); }
        let euler = EulerAngles::from_quat(harness.local("Head").rotation);
        assert!(euler.x > EulerAngles::from_quat(held.rotation).x);
        assert_abs_diff_eq!(euler.x, 0.5, epsilon = 1e-2);
    }

    #[test]
    fn second_play_replaces_first()
    {
        let mut harness = Harness::new();
        harness.playback.request("bonjour", Ok(tagged_frames("A", 20)), harness.now);
        for _ in 0..5 { harness.render(); }
        let written_by_first = harness.slot.writes();
        assert!(written_by_first > 0 && written_by_first < 20);

        harness.playback.request("merci", Ok(tagged_frames("B", 4)), harness.now);
        let seen = harness.render_to_end();
        let first_b = seen.iter().position(|t| t.starts_with('B')).unwrap();
        assert!(first_b <= 1, "stale frames after replay: {seen:?}");
        assert_eq!(&seen[first_b..], ["B0", "B1", "B2", "B3"]);
        assert_eq!(harness.slot.writes(), written_by_first + 4);
    }

    #[test]
    fn empty_response_keeps_idling()
    {
        let mut harness = Harness::new();
        let frames = parse_frames("[]").unwrap();
        assert_eq!(harness.playback.request("merci", Ok(frames), harness.now), &PlaybackStatus::NoAnimationFound("merci".into()));
        assert_eq!(harness.playback.status().to_string(), "No animation found for \"merci\"");

        let mut neck_angles = Vec::new();
        for _ in 0..20
        {
            let (event, frame) = harness.render();
            assert_eq!(event, ScheduleEvent::Idle);
            assert!(frame.is_none());
            neck_angles.push(EulerAngles::from_quat(harness.local("Neck").rotation).x);
        }
        assert!(neck_angles.iter().any(|a| a.abs() > 0.01));
        assert!(neck_angles.iter().all(|a| a.abs() <= 0.1 + 1e-5));
        assert_eq!(harness.local("Head"), Transform::IDENTITY);
        assert_eq!(harness.slot.writes(), 0);
    }

    #[test]
    fn library_round_trip()
    {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("merci.json"), r#"[
            { "RightWrist": { "x": 0.0, "y": 0.0, "z": 1.0 }, "Hips": { "x": 0, "y": 0, "z": 0, "position": { "x": 2, "y": 0, "z": -3 } } },
            { "RightWrist": { "x": 0.0, "y": 0.0, "z": 1.0 }, "Tail": { "x": 1, "y": 0, "z": 0 }, "Neck": "garbage" }
        ]"#).unwrap();
        let library = KeypointLibrary::new(dir.path());

        let mut harness = Harness::new();
        harness.playback.request("Merci", library.load("Merci"), harness.now);
        harness.render_to_end();
        assert_eq!(harness.slot.writes(), 2);

        let hand = EulerAngles::from_quat(harness.local("RightHand").rotation);
        assert!(hand.z > 0.5 && hand.z <= 1.0);
        let hips = harness.local("Hips").position;
        assert!(hips.x > 0.0 && hips.x <= 1.0 && hips.z < 0.0 && hips.z >= -1.0);

        harness.playback.request("de rien", library.load("de rien"), harness.now);
        assert_eq!(harness.playback.status(), &PlaybackStatus::NoAnimationFound("de rien".into()));
    }

    #[test]
    fn frame_period_is_configurable()
    {
        let config = RetargetConfig::from_toml_str("[playback]\nframe_period_ms = 100").unwrap();
        let slot = FrameSlot::new();
        let mut playback = Playback::new(FrameScheduler::new(slot.clone(), config.playback.frame_period()));
        assert_eq!(playback.scheduler().period(), Duration::from_millis(100));

        playback.request("merci", Ok(tagged_frames("A", 3)), 0);
        assert_eq!(playback.tick(99 * MS), ScheduleEvent::Waiting);
        assert_eq!(playback.tick(100 * MS), ScheduleEvent::Advanced { index: 0 });
        assert_eq!(playback.tick(350 * MS), ScheduleEvent::Advanced { index: 2 });
        assert_eq!(playback.tick(400 * MS), ScheduleEvent::Finished);
        assert_eq!(slot.writes(), 3);
    }
}
