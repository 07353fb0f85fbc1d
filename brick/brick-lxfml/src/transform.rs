//! Placement transformation decoding.
//!
//! A part's placement is stored as twelve comma-separated numbers: the 3x3
//! linear block, column by column, followed by the translation.
//!
//! ```text
//! "a,b,c, d,e,f, g,h,i, x,y,z"
//!
//!     | a d g x |
//!     | b e h y |
//!     | c f i z |
//!     | 0 0 0 1 |
//! ```

use nalgebra::Matrix4;

use crate::error::{LoadError, LoadResult};

/// Number of values in a complete placement.
pub const AFFINE_PARAMETER_COUNT: usize = 12;

/// Decode a comma-separated placement into a homogeneous 4x4 matrix.
///
/// Tokens are trimmed before parsing and trailing empty tokens are dropped.
/// Fewer than twelve values is accepted; the missing entries stay zero.
///
/// # Errors
///
/// - [`LoadError::InvalidTransformToken`] if a token is not a number
///   (an empty token included)
/// - [`LoadError::TooManyTransformValues`] if there are more than twelve
///
/// # Example
///
/// ```
/// use brick_lxfml::decode_transformation;
///
/// let m = decode_transformation("1,0,0,0,1,0,0,0,1,5,6,7").unwrap();
/// assert_eq!(m[(0, 3)], 5.0);
/// assert_eq!(m[(1, 3)], 6.0);
/// assert_eq!(m[(2, 3)], 7.0);
/// assert_eq!(m[(3, 3)], 1.0);
/// ```
pub fn decode_transformation(raw: &str) -> LoadResult<Matrix4<f64>> {
    let mut tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    // Trailing separators carry no value; the first token is always kept.
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let count = tokens.len();
    if count > AFFINE_PARAMETER_COUNT {
        return Err(LoadError::TooManyTransformValues { count });
    }

    let mut parameters = [0.0; AFFINE_PARAMETER_COUNT];
    for (position, token) in tokens.into_iter().enumerate() {
        parameters[position] = token.parse().map_err(|_| LoadError::InvalidTransformToken {
            token: token.to_string(),
            position,
        })?;
    }

    Ok(affine_from_parameters(&parameters[..count]))
}

/// Build a column-major homogeneous matrix from 3x4 affine parameters.
///
/// Value `k` lands in column `k / 3`, row `k % 3`. The bottom row is always
/// `(0, 0, 0, 1)`. Values past the twelfth are ignored; missing values are
/// zero.
#[must_use]
pub fn affine_from_parameters(parameters: &[f64]) -> Matrix4<f64> {
    let mut matrix = Matrix4::zeros();
    for (k, &value) in parameters.iter().take(AFFINE_PARAMETER_COUNT).enumerate() {
        matrix[(k % 3, k / 3)] = value;
    }
    matrix[(3, 3)] = 1.0;
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn identity_with_translation() {
        let m = decode_transformation("1,0,0,0,1,0,0,0,1,5,6,7").unwrap();
        let columns: Vec<[f64; 4]> = m
            .column_iter()
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        assert_eq!(
            columns,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [5.0, 6.0, 7.0, 1.0],
            ]
        );
    }

    #[test]
    fn column_major_storage() {
        let m = decode_transformation("1,2,3,4,5,6,7,8,9,10,11,12").unwrap();
        let expected = [
            1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0, 10.0, 11.0, 12.0, 1.0,
        ];
        assert_eq!(m.as_slice(), &expected);
    }

    #[test]
    fn rotation_applies_to_points() {
        // 90 degrees about Z, then translate by (0.8, 0, 0)
        let m = decode_transformation("0,1,0,-1,0,0,0,0,1,0.8,0,0").unwrap();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.8, 1.0, 0.0), epsilon = 1e-12);

        let n = m.transform_vector(&Vector3::x());
        assert_relative_eq!(n, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn tokens_are_trimmed() {
        let m = decode_transformation(" 1, 0 ,0,0,1,0,0,0,1,\t2.5,0,0 ").unwrap();
        assert_relative_eq!(m[(0, 3)], 2.5);
    }

    #[test]
    fn short_input_leaves_zeros() {
        let m = decode_transformation("1,0,0,0,1").unwrap();
        assert_relative_eq!(m[(0, 0)], 1.0);
        assert_relative_eq!(m[(1, 1)], 1.0);
        assert_relative_eq!(m[(2, 2)], 0.0);
        assert_relative_eq!(m[(0, 3)], 0.0);
        assert_relative_eq!(m[(3, 3)], 1.0);
    }

    #[test]
    fn rejects_non_numeric_token() {
        let err = decode_transformation("1,0,0,0,x,0,0,0,1,0,0,0").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidTransformToken { ref token, position: 4 } if token == "x"
        ));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn rejects_empty_token() {
        assert!(matches!(
            decode_transformation("1,,0"),
            Err(LoadError::InvalidTransformToken { position: 1, .. })
        ));
        assert!(matches!(
            decode_transformation(""),
            Err(LoadError::InvalidTransformToken { position: 0, .. })
        ));
    }

    #[test]
    fn trailing_separators_are_ignored() {
        let expected = decode_transformation("1,0,0,0,1,0,0,0,1,5,6,7").unwrap();
        assert_eq!(decode_transformation("1,0,0,0,1,0,0,0,1,5,6,7,").unwrap(), expected);
        assert_eq!(decode_transformation("1,0,0,0,1,0,0,0,1,5,6,7, ,").unwrap(), expected);
        // An empty token before a value still counts.
        assert!(matches!(
            decode_transformation("1,0,0,0,1,0,0,0,1,5,6,,7"),
            Err(LoadError::InvalidTransformToken { position: 11, .. })
        ));
    }

    #[test]
    fn rejects_too_many_values() {
        let err = decode_transformation("1,0,0,0,1,0,0,0,1,0,0,0,9").unwrap_err();
        assert!(matches!(err, LoadError::TooManyTransformValues { count: 13 }));
    }

    #[test]
    fn homogeneous_row_is_forced() {
        let m = affine_from_parameters(&[7.0; 12]);
        assert_eq!(m.row(3).iter().copied().collect::<Vec<_>>(), [0.0, 0.0, 0.0, 1.0]);
    }
}
