use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;

/// A satellite handle: parsed orbital elements plus the derived SGP4
/// constants, ready for propagation. Immutable once constructed.
pub struct Satellite {
    pub name: String,
    pub norad_id: u32,
    pub elements: Elements,
    pub constants: Constants,
}

impl Satellite {
    /// Parse a TLE block: two element lines, optionally preceded by a name line.
    pub fn from_tle(text: &str) -> Result<Self, PredictError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        match lines.len() {
            2 => Self::from_lines(None, lines[0], lines[1]),
            3 => Self::from_lines(Some(lines[0].to_string()), lines[1], lines[2]),
            _ => Err(PredictError::InvalidTleFormat),
        }
    }

    pub fn from_lines(
        name: Option<String>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;

        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            name,
            norad_id: elements.norad_id as u32,
            elements,
            constants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 62688U 25009CH  25124.74930353  .00015765  00000+0  69252-3 0  9994";
    const LINE2: &str = "2 62688  97.4284 205.7904 0001127  28.6595 331.4703 15.22003295 16668";

    #[test]
    fn parses_three_line_block() {
        let sat = Satellite::from_tle(&format!("Bluebon\n{}\n{}\n", LINE1, LINE2)).unwrap();
        assert_eq!(sat.name, "Bluebon");
        assert_eq!(sat.norad_id, 62688);
    }

    #[test]
    fn parses_two_line_block_with_fallback_name() {
        let sat = Satellite::from_tle(&format!("{}\n{}", LINE1, LINE2)).unwrap();
        assert_eq!(sat.name, "NORAD 62688");
    }

    #[test]
    fn rejects_wrong_line_count() {
        assert!(matches!(
            Satellite::from_tle(LINE1),
            Err(PredictError::InvalidTleFormat)
        ));
    }

    #[test]
    fn rejects_garbage_lines() {
        assert!(Satellite::from_tle("not\na tle\nat all").is_err());
    }
}
