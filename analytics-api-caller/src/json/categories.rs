//! Categories the backend buckets demographic detections into. Each one
//! travels as its lowercase wire label.

use std::{fmt::Display, str::FromStr};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} `{value}`; expected one of: {expected}")]
pub struct UnknownCategory {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! wire_labels {
    ($kind:literal, $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &[$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .find(|c| c.label().eq_ignore_ascii_case(s))
                    .copied()
                    .ok_or_else(|| UnknownCategory {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|c| c.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

wire_labels!("gender", Gender {
    Male => "male",
    Female => "female",
});

wire_labels!("age group", AgeGroup {
    Under18 => "0-17",
    From18To24 => "18-24",
    From25To34 => "25-34",
    From35To44 => "35-44",
    From45To54 => "45-54",
    From55To64 => "55-64",
    Over64 => "65+",
});

wire_labels!("emotion", Emotion {
    Happy => "happy",
    Sad => "sad",
    Angry => "angry",
    Surprise => "surprise",
    Fear => "fear",
    Disgust => "disgust",
    Neutral => "neutral",
});

wire_labels!("ethnicity", Ethnicity {
    White => "white",
    Black => "black",
    Asian => "asian",
    Indian => "indian",
    MiddleEastern => "middle_eastern",
    LatinoHispanic => "latino_hispanic",
});
