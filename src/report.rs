//! Rendering of the final `{key=min/mean/max/count ...}` block.

use std::fmt::Write as _;
use std::io;

use crate::aggregate::{Aggregate, AggregateMap};

/// Decimal places used when none are configured.
pub const DEFAULT_PRECISION: usize = 1;

/// Renders a global map with a fixed number of decimals.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    precision: usize,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl ReportFormatter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Renders the whole report into a string.
    pub fn render(&self, map: &AggregateMap) -> String {
        let mut out = String::with_capacity(2 + map.len() * 48);
        out.push_str("{\n");
        for (key, agg) in map.sorted() {
            self.push_line(&mut out, key, agg);
        }
        out.push('}');
        out
    }

    /// Streams the report into `writer`. No trailing newline is written
    /// after the closing brace.
    pub fn write_to<W: io::Write>(&self, map: &AggregateMap, mut writer: W) -> io::Result<()> {
        writer.write_all(b"{\n")?;
        let mut line = String::with_capacity(64);
        for (key, agg) in map.sorted() {
            line.clear();
            self.push_line(&mut line, key, agg);
            writer.write_all(line.as_bytes())?;
        }
        writer.write_all(b"}")?;
        writer.flush()
    }

    fn push_line(&self, out: &mut String, key: &str, agg: &Aggregate) {
        let p = self.precision;
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{key}={:.p$}/{:.p$}/{:.p$}/{}",
            agg.min,
            agg.mean(),
            agg.max,
            agg.count
        );
    }
}

/// Renders with the default single decimal place.
pub fn render(map: &AggregateMap) -> String {
    ReportFormatter::default().render(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(records: &[(&str, f64)]) -> AggregateMap {
        let mut map = AggregateMap::new();
        for (key, value) in records {
            map.record(key, *value);
        }
        map
    }

    #[test]
    fn renders_sorted_lines() {
        let map = map_of(&[("Zurich", 1.0), ("Amsterdam", 2.0)]);
        assert_eq!(render(&map), "{\nAmsterdam=2.0/2.0/2.0/1\nZurich=1.0/1.0/1.0/1\n}");
    }

    #[test]
    fn renders_mean_of_several_values() {
        let map = map_of(&[("Paris", 15.5), ("Paris", 20.5)]);
        assert_eq!(render(&map), "{\nParis=15.5/18.0/20.5/2\n}");
    }

    #[test]
    fn empty_map_renders_braces_only() {
        assert_eq!(render(&AggregateMap::new()), "{\n}");
    }

    #[test]
    fn rendering_is_idempotent() {
        let map = map_of(&[("b", -3.25), ("a", 7.0), ("b", 4.0), ("c", 0.05)]);
        assert_eq!(render(&map), render(&map));
    }

    #[test]
    fn honours_precision() {
        let map = map_of(&[("Lima", 18.126), ("Lima", 18.0)]);
        let two = ReportFormatter::new(2).render(&map);
        assert_eq!(two, "{\nLima=18.00/18.06/18.13/2\n}");
    }

    #[test]
    fn write_to_matches_render() {
        let map = map_of(&[("Tokyo", 10.0), ("Oslo", -2.5), ("Oslo", 1.5)]);
        let formatter = ReportFormatter::default();
        let mut buf = Vec::new();
        formatter.write_to(&map, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), formatter.render(&map));
    }
}
