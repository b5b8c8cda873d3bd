use std::ops::Deref;

use serde::Deserialize;

/// Human readable duration like `"5s"`, `"250ms"` or `"1m 30s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::str::FromStr for Duration {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .try_fold(std::time::Duration::ZERO, |acc, part| {
                let split = part
                    .find(|c: char| !c.is_ascii_digit())
                    .ok_or("Missing duration unit")?;
                let (value, unit) = part.split_at(split);
                let value = value.parse::<u64>().map_err(|_| "Invalid duration")?;
                let part = match unit {
                    "ms" => std::time::Duration::from_millis(value),
                    "s" => std::time::Duration::from_secs(value),
                    "m" => std::time::Duration::from_secs(
                        value.checked_mul(60).ok_or("Duration too large")?,
                    ),
                    "h" => std::time::Duration::from_secs(
                        value.checked_mul(3600).ok_or("Duration too large")?,
                    ),
                    _ => return Err("Invalid duration unit"),
                };
                acc.checked_add(part).ok_or("Duration too large")
            })
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration() {
        for (input, expected) in [
            ("13s", Some(13_000u64)),
            ("250ms", Some(250)),
            ("42m", Some(42 * 60_000)),
            ("7h", Some(7 * 3_600_000)),
            ("", Some(0)),
            ("1m 30s", Some(90_000)),
            ("1h 2m 3s 4ms", Some(((60 + 2) * 60 + 3) * 1000 + 4)),
            ("xyz", None),
            ("7", None),
            ("7ss", None),
            ("s", None),
            ("99999999999999999h", None),
            ("18446744073709551615m", None),
            ("18446744073709551615s 18446744073709551615s", None),
        ] {
            let input = serde_json::Value::String(input.into());
            let output = serde_json::from_value::<Duration>(input)
                .ok()
                .map(|x| x.0.as_millis());
            assert_eq!(output, expected.map(u128::from));
        }
    }
}
