//! CPU-side WGSL validation.
//!
//! Shader and kernel sources are validated with naga before any device
//! module is created, so compile failures surface during pipeline init with
//! build-log detail instead of asynchronous device errors mid-frame.

use crate::RenderError;

/// Parses and validates `source`, mapping failures to
/// [`RenderError::Compile`] with a numbered source listing.
pub(crate) fn validate_wgsl(name: &str, source: &str) -> Result<(), RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::Compile {
        name: name.to_string(),
        log: format!("{}\n{}", e.emit_to_string(source), numbered_source(source)),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| RenderError::Compile {
        name: name.to_string(),
        log: format!("{e:?}\n{}", numbered_source(source)),
    })?;

    Ok(())
}

fn numbered_source(source: &str) -> String {
    let mut out = String::from("---\n");
    for (line_num, line) in source.lines().enumerate() {
        out.push_str(&format!("{:4} | {}\n", line_num + 1, line));
    }
    out.push_str("---");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_wgsl_passes() {
        let source = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;
        assert!(validate_wgsl("test", source).is_ok());
    }

    #[test]
    fn broken_wgsl_reports_compile_error_with_log() {
        let err = validate_wgsl("broken", "fn vs_main( -> oops {").unwrap_err();
        match err {
            RenderError::Compile { name, log } => {
                assert_eq!(name, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("expected Compile error, got {other:?}"),
        }
    }
}
