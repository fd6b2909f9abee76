//! Math type re-exports and vector helpers.
//!
//! Three-component vector values are plain `glam` vectors; this module only
//! adds the text form used by tools.

pub use glam::Vec3;

/// Vector value stored in metadata slots.
pub type Vector3 = Vec3;

/// Format a vector as `x,y,z`.
pub fn format_vector3(v: Vector3) -> String {
    format!("{},{},{}", v.x, v.y, v.z)
}

/// Parse `x,y,z` (whitespace around components allowed).
///
/// Returns `None` unless there are exactly three float components.
pub fn parse_vector3(s: &str) -> Option<Vector3> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<f32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector3() {
        assert_eq!(parse_vector3("1,2,3"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(parse_vector3(" 0.5 , -1 ,2e1"), Some(Vec3::new(0.5, -1.0, 20.0)));
        assert_eq!(parse_vector3("1,2"), None);
        assert_eq!(parse_vector3("1,2,3,4"), None);
        assert_eq!(parse_vector3("a,b,c"), None);
    }

    #[test]
    fn test_format_vector3() {
        let v = Vec3::new(1.5, 0.0, -2.0);
        assert_eq!(format_vector3(v), "1.5,0,-2");
        assert_eq!(parse_vector3(&format_vector3(v)), Some(v));
    }
}
