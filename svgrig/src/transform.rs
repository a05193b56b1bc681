use crate::{Affine, Error, Warning};

/// Parses a single `translate(tx, ty)` or `matrix(a, b, c, d, e, f)` call.
///
/// Arguments may be separated by commas, whitespace or both. `translate`
/// with one argument leaves `ty` at zero.
pub fn parse_transform(value: &str) -> Result<Affine, Error> {
    let malformed = |message: String| Error::MalformedTransform {
        value: value.to_string(),
        message,
    };

    let mut parts = value
        .split(|c: char| c == '(' || c == ')' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let name = parts
        .next()
        .ok_or_else(|| malformed("empty transform".to_string()))?;

    let mut args = Vec::with_capacity(6);
    for raw in parts {
        let arg: f64 = raw
            .parse()
            .map_err(|_| malformed(format!("invalid argument '{raw}'")))?;
        if !arg.is_finite() {
            return Err(malformed(format!("non-finite argument '{raw}'")));
        }
        args.push(arg);
    }

    match (name, args.as_slice()) {
        ("translate", &[tx]) => Ok(Affine::translate(tx, 0.0)),
        ("translate", &[tx, ty]) => Ok(Affine::translate(tx, ty)),
        ("matrix", &[a, b, c, d, e, f]) => Ok(Affine::new(a, b, c, d, e, f)),
        ("translate" | "matrix", _) => Err(malformed(format!(
            "wrong argument count {} for {name}",
            args.len()
        ))),
        _ => Err(malformed(format!("unsupported function '{name}'"))),
    }
}

impl Affine {
    /// Composes a `transform` attribute onto `self`. A malformed attribute
    /// leaves `self` unchanged and is returned as a warning.
    pub fn apply_transform_attr(&mut self, value: &str) -> Option<Warning> {
        match parse_transform(value) {
            Ok(parsed) => {
                *self = self.then_inner(&parsed);
                None
            }
            Err(err) => {
                log::warn!("{err}");
                Some(Warning::MalformedTransform {
                    message: err.to_string(),
                })
            }
        }
    }
}
