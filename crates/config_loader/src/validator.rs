//! Configuration validation
//!
//! Rules:
//! - camera dimensions and frequency positive
//! - principal point inside the image, focal lengths and baseline positive
//! - min_depth < max_depth
//! - floor tuning in range (iterations > 0, thresholds positive,
//!   inlier ratio in (0, 1], subsample step > 0)
//! - replay path non-empty and speed positive when replay is configured
//! - sink names unique, required per-kind params present

use std::collections::HashSet;

use contracts::{SinkKind, ViewerBlueprint, ViewerError};

/// Validate a ViewerBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ViewerBlueprint) -> Result<(), ViewerError> {
    validate_camera(blueprint)?;
    validate_floor(blueprint)?;
    validate_replay(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_camera(blueprint: &ViewerBlueprint) -> Result<(), ViewerError> {
    let cam = &blueprint.camera;

    if cam.id.is_empty() {
        return Err(ViewerError::config_validation("camera.id", "must not be empty"));
    }
    if cam.width == 0 || cam.height == 0 {
        return Err(ViewerError::config_validation(
            "camera.width/height",
            format!("dimensions must be > 0, got {}x{}", cam.width, cam.height),
        ));
    }
    if cam.frequency_hz <= 0.0 {
        return Err(ViewerError::config_validation(
            "camera.frequency_hz",
            format!("must be > 0, got {}", cam.frequency_hz),
        ));
    }

    let k = &cam.intrinsics;
    if k.fx <= 0.0 || k.fy <= 0.0 {
        return Err(ViewerError::config_validation(
            "camera.intrinsics.fx/fy",
            "focal lengths must be > 0",
        ));
    }
    if k.baseline_m <= 0.0 {
        return Err(ViewerError::config_validation(
            "camera.intrinsics.baseline_m",
            "baseline must be > 0",
        ));
    }
    if k.cx < 0.0 || k.cx >= cam.width as f64 || k.cy < 0.0 || k.cy >= cam.height as f64 {
        return Err(ViewerError::config_validation(
            "camera.intrinsics.cx/cy",
            format!(
                "principal point ({}, {}) outside {}x{} image",
                k.cx, k.cy, cam.width, cam.height
            ),
        ));
    }

    if cam.min_depth_m <= 0.0 || cam.min_depth_m >= cam.max_depth_m {
        return Err(ViewerError::config_validation(
            "camera.min_depth_m/max_depth_m",
            format!(
                "need 0 < min < max, got min={} max={}",
                cam.min_depth_m, cam.max_depth_m
            ),
        ));
    }

    Ok(())
}

fn validate_floor(blueprint: &ViewerBlueprint) -> Result<(), ViewerError> {
    let floor = &blueprint.floor;

    if floor.ransac_iterations == 0 {
        return Err(ViewerError::config_validation(
            "floor.ransac_iterations",
            "must be > 0",
        ));
    }
    if floor.distance_threshold_m <= 0.0 {
        return Err(ViewerError::config_validation(
            "floor.distance_threshold_m",
            format!("must be > 0, got {}", floor.distance_threshold_m),
        ));
    }
    if floor.max_normal_dev_deg <= 0.0 || floor.max_normal_dev_deg >= 90.0 {
        return Err(ViewerError::config_validation(
            "floor.max_normal_dev_deg",
            format!("must be in (0, 90), got {}", floor.max_normal_dev_deg),
        ));
    }
    if floor.subsample_step == 0 {
        return Err(ViewerError::config_validation(
            "floor.subsample_step",
            "must be > 0",
        ));
    }
    if floor.min_inlier_ratio <= 0.0 || floor.min_inlier_ratio > 1.0 {
        return Err(ViewerError::config_validation(
            "floor.min_inlier_ratio",
            format!("must be in (0, 1], got {}", floor.min_inlier_ratio),
        ));
    }

    Ok(())
}

fn validate_replay(blueprint: &ViewerBlueprint) -> Result<(), ViewerError> {
    let Some(replay) = &blueprint.replay else {
        return Ok(());
    };

    if replay.path.as_os_str().is_empty() {
        return Err(ViewerError::config_validation(
            "replay.path",
            "must not be empty",
        ));
    }
    if replay.speed_multiplier <= 0.0 {
        return Err(ViewerError::config_validation(
            "replay.speed_multiplier",
            format!("must be > 0, got {}", replay.speed_multiplier),
        ));
    }

    Ok(())
}

fn validate_sinks(blueprint: &ViewerBlueprint) -> Result<(), ViewerError> {
    let mut seen = HashSet::new();
    for sink in &blueprint.sinks {
        if sink.name.is_empty() {
            return Err(ViewerError::config_validation("sinks.name", "must not be empty"));
        }
        if !seen.insert(&sink.name) {
            return Err(ViewerError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.kind == SinkKind::File && !sink.params.contains_key("base_path") {
            return Err(ViewerError::config_validation(
                format!("sinks[name={}].params", sink.name),
                "file sink requires a 'base_path' param",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkConfig, ViewerBlueprint};
    use std::collections::HashMap;

    fn assert_field(result: Result<(), ViewerError>, field_part: &str) {
        match result {
            Err(ViewerError::ConfigValidation { field, .. }) => {
                assert!(
                    field.contains(field_part),
                    "expected field containing '{field_part}', got '{field}'"
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_blueprint_valid() {
        assert!(validate(&ViewerBlueprint::default()).is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut bp = ViewerBlueprint::default();
        bp.camera.width = 0;
        assert_field(validate(&bp), "width");
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut bp = ViewerBlueprint::default();
        bp.camera.frequency_hz = 0.0;
        assert_field(validate(&bp), "frequency_hz");
    }

    #[test]
    fn test_principal_point_outside_image_rejected() {
        let mut bp = ViewerBlueprint::default();
        bp.camera.intrinsics.cx = 10_000.0;
        assert_field(validate(&bp), "cx");
    }

    #[test]
    fn test_depth_range_order_enforced() {
        let mut bp = ViewerBlueprint::default();
        bp.camera.min_depth_m = 9.0;
        bp.camera.max_depth_m = 2.0;
        assert_field(validate(&bp), "min_depth_m");
    }

    #[test]
    fn test_floor_inlier_ratio_range() {
        let mut bp = ViewerBlueprint::default();
        bp.floor.min_inlier_ratio = 1.5;
        assert_field(validate(&bp), "min_inlier_ratio");
    }

    #[test]
    fn test_replay_speed_must_be_positive() {
        let mut bp = ViewerBlueprint::default();
        bp.replay = Some(contracts::ReplayConfig {
            path: "/tmp/rec".into(),
            speed_multiplier: 0.0,
            loop_playback: false,
        });
        assert_field(validate(&bp), "speed_multiplier");
    }

    #[test]
    fn test_duplicate_sink_names_rejected() {
        let mut bp = ViewerBlueprint::default();
        bp.sinks = vec![
            SinkConfig {
                name: "x".into(),
                kind: SinkKind::Log,
                params: HashMap::new(),
            },
            SinkConfig {
                name: "x".into(),
                kind: SinkKind::Log,
                params: HashMap::new(),
            },
        ];
        assert_field(validate(&bp), "sinks[name=x]");
    }

    #[test]
    fn test_file_sink_requires_base_path() {
        let mut bp = ViewerBlueprint::default();
        bp.sinks = vec![SinkConfig {
            name: "frames".into(),
            kind: SinkKind::File,
            params: HashMap::new(),
        }];
        assert_field(validate(&bp), "frames");
    }
}
