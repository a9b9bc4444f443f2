use serde::Deserialize;

/// Title lookup response (`/?t=...`). Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct OmdbTitleResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbTitleResponse {
    pub fn found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// First release year. OMDb sends ranges for series (`"2008–2013"`, `"2019–"`).
    pub fn release_year(&self) -> Option<i32> {
        let year = self.year.as_deref()?;
        let digits: String = year.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }
}
