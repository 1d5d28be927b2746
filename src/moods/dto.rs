use serde::Deserialize;
use time::Date;

use crate::dates;

#[derive(Debug, Deserialize)]
pub struct CreateMoodRequest {
    pub mood: i32,
    pub stress: i32,
    pub note: Option<String>,
    #[serde(default, with = "dates::iso_date_option")]
    pub date: Option<Date>,
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(with = "dates::iso_date")]
    pub start: Date,
    #[serde(with = "dates::iso_date")]
    pub end: Date,
}
