use serde::ser::{Serialize, SerializeMap, Serializer};

/// Keys of a complete feature vector, in output order.
pub const FEATURE_KEYS: [&str; 13] = [
    "face_lw_ratio",
    "forehead_ratio",
    "midface_ratio",
    "lowerface_ratio",
    "eye_distance_ratio",
    "nose_ratio",
    "mouth_chin_ratio",
    "jaw_angle",
    "upper_lip_ratio",
    "lower_lip_ratio",
    "eye_aspect_ratio",
    "eye_curvature_ratio",
    "eye_symmetry",
];

/// Round to `decimals` places.
///
/// Rounding is decided on the exact binary value, with exact ties going to the
/// even digit, so `0.0625` becomes `0.062` and `1.0005` (stored just below the
/// tie) becomes `1.0`. The result is the `f64` nearest the rounded decimal.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Precision formatting expands the exact value and breaks ties to even.
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Named face features, kept in insertion order.
///
/// Inserting an existing key replaces its value in place, so a later source
/// wins over an earlier one without reordering the output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert every entry of `other`, overwriting keys already present.
    pub fn merge<'a, I>(&mut self, other: I)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// A copy with every value rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), round_to(*v, decimals)))
                .collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        let mut fv = Self::new();
        fv.merge(iter);
        fv
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_to_three_places() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(-0.1236, 3), -0.124);
        assert_eq!(round_to(119.0, 3), 119.0);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(round_to(0.0625, 3), 0.062);
        assert_eq!(round_to(0.3125, 3), 0.312);
        assert_eq!(round_to(119.0625, 3), 119.062);
        assert_eq!(round_to(-0.0625, 3), -0.062);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
    }

    #[test]
    fn rounding_uses_the_stored_value() {
        // Stored slightly below the tie.
        assert_eq!(round_to(1.0005, 3), 1.0);
        assert_eq!(round_to(0.0875, 3), 0.087);
        // Stored slightly above the tie.
        assert_eq!(round_to(0.0015, 3), 0.002);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(round_to(f64::INFINITY, 3), f64::INFINITY);
    }

    #[test]
    fn later_insert_wins_and_keeps_position() {
        let mut fv: FeatureVector = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        fv.merge([("a", 3.0), ("c", 4.0)]);

        assert_eq!(fv.len(), 3);
        assert_eq!(fv.get("a"), Some(3.0));
        assert_eq!(fv.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(fv.get("missing"), None);
    }

    #[test]
    fn rounded_copy() {
        let fv: FeatureVector = [("x", 0.123456), ("y", 0.9999)].into_iter().collect();
        let r = fv.rounded(3);
        assert_eq!(r.get("x"), Some(0.123));
        assert_eq!(r.get("y"), Some(1.0));
        assert_eq!(fv.get("x"), Some(0.123456));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let fv: FeatureVector = [("b", 0.5), ("a", 0.25)].into_iter().collect();
        let json = serde_json::to_string(&fv).unwrap();
        assert_eq!(json, r#"{"b":0.5,"a":0.25}"#);
    }
}
