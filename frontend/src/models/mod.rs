pub mod bid;
pub mod contract;
pub mod expense;
pub mod info_request;
pub mod revenue;
pub mod staff;
pub mod user;

use chrono::NaiveDate;

/// Closed set of values with an API spelling and a display label.
///
/// Parsing accepts either spelling so select inputs and stored drafts agree.
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($value:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant,)+
        }

        impl $name {
            pub const OPTIONS: &'static [(&'static str, &'static str)] = &[$(($value, $label)),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $value || s == $label {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("unknown {}: {}", stringify!($name), s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub(crate) use choice;

pub(crate) fn display_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub(crate) fn draft_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    choice!(Color {
        Red => ("red", "Vermelho"),
        Blue => ("blue", "Azul"),
    });

    #[test]
    fn parses_value_or_label() {
        assert_eq!("red".parse::<Color>(), Ok(Color::Red));
        assert_eq!("Azul".parse::<Color>(), Ok(Color::Blue));
        assert!("green".parse::<Color>().is_err());
    }

    #[test]
    fn serializes_api_value() {
        assert_eq!(serde_json::to_string(&Color::Blue).unwrap(), "\"blue\"");
        assert_eq!(Color::Red.to_string(), "Vermelho");
        assert_eq!(Color::OPTIONS[1], ("blue", "Azul"));
    }

    #[test]
    fn dates_display_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(display_date(&date), "09/03/2024");
    }
}
