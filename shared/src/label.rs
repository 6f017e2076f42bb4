const CROP_SEPARATOR: &str = "___";

/// A classifier label split into its crop and condition, e.g.
/// `Corn_(maize)___Common_rust_` becomes `Corn (maize)` / `Common rust`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelParts {
    pub crop: Option<String>,
    pub condition: String,
}

impl LabelParts {
    pub fn parse(label: &str) -> Self {
        match label.split_once(CROP_SEPARATOR) {
            Some((crop, condition)) => {
                let crop = humanize(crop);
                Self {
                    crop: (!crop.is_empty()).then_some(crop),
                    condition: humanize(condition),
                }
            }
            None => Self {
                crop: None,
                condition: humanize(label),
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.condition.eq_ignore_ascii_case("healthy")
    }
}

fn humanize(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
