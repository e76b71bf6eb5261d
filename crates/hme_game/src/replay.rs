use hme_core::input::{FrameInput, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let input = FrameInput::from_keys(&frame.held);
            for _ in 0..frame.repeat.max(1) {
                out.push(input);
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(replay)
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, IVec2, UVec2};
    use hme_core::{MapGeometry, WorldState};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hme_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_replay(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    fn geometry() -> MapGeometry {
        MapGeometry::from_map(IVec2::new(2000, 1000), UVec2::new(1024, 768))
    }

    fn run(replay: &ReplaySequence, geometry: &MapGeometry) -> WorldState {
        replay
            .expanded_inputs()
            .iter()
            .fold(WorldState::spawn(geometry), |state, input| {
                let next = state.update(input, geometry);
                let vmax = geometry.viewport_max();
                assert!(next.viewport.x >= 0 && next.viewport.x <= vmax.x);
                assert!(next.viewport.y >= 0 && next.viewport.y <= vmax.y);
                next
            })
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = write_replay(
            "parse",
            r#"{
              "frames": [
                { "held": ["d"], "repeat": 3 },
                { "held": ["w", "left"] },
                { "repeat": 2 }
              ]
            }"#,
        );
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 6);
        assert!(expanded[0].move_right);
        assert!(expanded[3].move_up && expanded[3].pan_left);
        assert!(expanded[5].is_idle());
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay must fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let path = temp_file_path("bad_key");
        fs::write(&path, r#"{ "frames": [ { "held": ["space"] } ] }"#).expect("write replay");
        let err = load_replay_from_path(&path).expect_err("unknown key must fail");
        assert!(err.starts_with("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = write_replay(
            "deterministic",
            r#"{
              "frames": [
                { "held": ["d"], "repeat": 200 },
                { "held": ["d", "s"], "repeat": 90 },
                { "held": ["right", "down"], "repeat": 30 },
                { "held": ["a", "w"], "repeat": 45 },
                { "repeat": 10 }
              ]
            }"#,
        );
        let geometry = geometry();
        let run_a = run(&replay, &geometry);
        let run_b = run(&replay, &geometry);
        assert_eq!(run_a, run_b);
        // 200 + 90 - 45 ticks right, 90 - 45 ticks down, 3 px each.
        assert_eq!(run_a.player, DVec2::new(239.0 + 245.0 * 3.0, 239.0 + 45.0 * 3.0));
    }

    #[test]
    fn long_walk_pins_camera_to_far_corner() {
        let replay = write_replay(
            "corner",
            r#"{ "frames": [ { "held": ["s", "d"], "repeat": 1000 } ] }"#,
        );
        let geometry = geometry();
        let end = run(&replay, &geometry);
        assert_eq!(end.player, geometry.player_max());
        assert_eq!(end.viewport, geometry.viewport_max());
    }
}
