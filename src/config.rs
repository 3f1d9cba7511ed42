use crate::error::ConfigError;
use crate::matrix::Fill;

/// Coordinator-side settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Matrix order N.
    pub order: usize,
    pub fill: Fill,
    /// Also compute the sequential product and compare.
    pub verify: bool,
    /// Print A, B and C.
    pub print: bool,
}

impl Settings {
    pub fn new(order: usize) -> Self {
        Settings {
            order,
            fill: Fill::Indexed,
            verify: false,
            print: false,
        }
    }
}

/// Turns the raw positional argument into a matrix order.
///
/// * `raw`: The argument as given on the command line, if any.
pub fn parse_order(raw: Option<&str>) -> Result<usize, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingOrder)?;
    match raw.trim().parse::<usize>() {
        // the row-major buffers hold order * order values
        Ok(order) if order > 0 && order.checked_mul(order).is_some() => Ok(order),
        _ => Err(ConfigError::InvalidOrder(raw.to_string())),
    }
}

/// Checks the size of an in-process group.
pub fn parse_participants(count: usize) -> Result<usize, ConfigError> {
    if count == 0 {
        return Err(ConfigError::NoParticipants);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_order(Some("1")), Ok(1));
        assert_eq!(parse_order(Some("512")), Ok(512));
        assert_eq!(parse_order(Some(" 12 ")), Ok(12));
    }

    #[test]
    fn rejects_missing_order() {
        assert_eq!(parse_order(None), Err(ConfigError::MissingOrder));
    }

    #[test]
    fn rejects_non_positive_or_non_numeric() {
        for raw in ["0", "-3", "abc", "", "4.5"] {
            assert_eq!(
                parse_order(Some(raw)),
                Err(ConfigError::InvalidOrder(raw.to_string())),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn rejects_order_whose_square_overflows() {
        let huge = usize::MAX.to_string();
        assert_eq!(
            parse_order(Some(&huge)),
            Err(ConfigError::InvalidOrder(huge.clone()))
        );

        let largest = (usize::MAX as f64).sqrt() as usize;
        let just_fits = (1..=largest + 1)
            .rev()
            .find(|n| n.checked_mul(*n).is_some())
            .unwrap();
        assert_eq!(parse_order(Some(&just_fits.to_string())), Ok(just_fits));
        let too_big = (just_fits + 1).to_string();
        assert_eq!(
            parse_order(Some(&too_big)),
            Err(ConfigError::InvalidOrder(too_big.clone()))
        );
    }

    #[test]
    fn participants_must_exist() {
        assert_eq!(parse_participants(0), Err(ConfigError::NoParticipants));
        assert_eq!(parse_participants(3), Ok(3));
    }

    #[test]
    fn defaults_use_indexed_fill() {
        let settings = Settings::new(8);
        assert_eq!(settings.fill, Fill::Indexed);
        assert!(!settings.verify && !settings.print);
    }
}
