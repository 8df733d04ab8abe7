//! Shared fixtures for unit tests

use super::table::SalesTable;
use polars::prelude::*;

/// Eight well-known titles, with a missing year (row 6), a missing
/// publisher (row 7) and a missing critic score (row 1)
pub(crate) fn sample_frame() -> DataFrame {
    df! {
        "Name" => [
            "Wii Sports",
            "Super Mario Bros.",
            "Mario Kart Wii",
            "Grand Theft Auto V",
            "Pokemon Red/Pokemon Blue",
            "Call of Duty: Modern Warfare 3",
            "FIFA 16",
            "Madden NFL 2004",
        ],
        "Platform" => ["Wii", "NES", "Wii", "PS3", "GB", "X360", "PS4", "PS2"],
        "Year_of_Release" => [
            Some(2006.0), Some(1985.0), Some(2008.0), Some(2013.0),
            Some(1996.0), Some(2011.0), None, Some(2003.0),
        ],
        "Genre" => [
            "Sports", "Platform", "Racing", "Action",
            "Role-Playing", "Shooter", "Sports", "Sports",
        ],
        "Publisher" => [
            Some("Nintendo"), Some("Nintendo"), Some("Nintendo"), Some("Take-Two Interactive"),
            Some("Nintendo"), Some("Activision"), Some("Electronic Arts"), None,
        ],
        "NA_Sales" => [41.36, 29.08, 15.68, 7.02, 11.27, 9.04, 1.11, 4.26],
        "EU_Sales" => [28.96, 3.58, 12.76, 9.09, 8.89, 4.24, 6.06, 0.26],
        "JP_Sales" => [3.77, 6.81, 3.79, 0.98, 10.22, 0.13, 0.06, 0.01],
        "Other_Sales" => [8.45, 0.77, 3.29, 3.96, 1.00, 1.32, 1.26, 0.71],
        "Global_Sales" => [82.53, 40.24, 35.52, 21.04, 31.37, 14.73, 8.49, 5.23],
        "Critic_Score" => [
            Some(76.0), None, Some(82.0), Some(97.0),
            None, Some(88.0), Some(82.0), Some(94.0),
        ],
    }
    .unwrap()
}

pub(crate) fn sample_table() -> SalesTable {
    SalesTable::from_frame(sample_frame()).unwrap()
}

/// The single-row example used throughout the documentation
pub(crate) fn nintendo_single() -> SalesTable {
    let df = df! {
        "Platform" => ["Wii"],
        "Year_of_Release" => [2006i64],
        "Genre" => ["Sports"],
        "Publisher" => ["Nintendo"],
        "NA_Sales" => [10.0],
        "EU_Sales" => [5.0],
        "JP_Sales" => [4.0],
        "Other_Sales" => [1.0],
        "Global_Sales" => [20.0],
    }
    .unwrap();
    SalesTable::from_frame(df).unwrap()
}
