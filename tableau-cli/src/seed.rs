//! The stock asset catalog shipped with the CLI.

use tableau_core::{AssetCatalog, AssetMetadata, Category};

/// `(id, width, height, byte_size, description)`
type StockEntry = (&'static str, u32, u32, u64, &'static str);

const BACKGROUNDS: [StockEntry; 5] = [
    ("bg_beach", 1920, 1080, 2_500_000, "Beach"),
    ("bg_forest", 1920, 1080, 2_400_000, "Forest"),
    ("bg_town", 1920, 1080, 2_350_000, "Town square"),
    ("bg_mountain", 1920, 1080, 2_600_000, "Mountain"),
    ("bg_house", 1920, 1080, 2_300_000, "House interior"),
];

const CHARACTERS: [StockEntry; 8] = [
    ("char_nook", 256, 256, 150_000, "Nook"),
    ("char_tom_nook", 256, 256, 160_000, "Tom Nook"),
    ("char_student_1", 256, 256, 140_000, "Student 1"),
    ("char_student_2", 256, 256, 145_000, "Student 2"),
    ("char_teacher", 256, 256, 155_000, "Teacher"),
    ("char_robot", 256, 256, 130_000, "Robot"),
    ("char_animal_1", 256, 256, 125_000, "Animal 1"),
    ("char_animal_2", 256, 256, 128_000, "Animal 2"),
];

const UI: [StockEntry; 8] = [
    ("ui_button", 200, 50, 25_000, "Button"),
    ("ui_text_box", 400, 100, 40_000, "Text box"),
    ("ui_dialog_box", 600, 200, 80_000, "Dialog box"),
    ("ui_badge", 100, 100, 20_000, "Badge"),
    ("ui_icon_code", 64, 64, 5_000, "Code icon"),
    ("ui_icon_check", 64, 64, 4_000, "Check icon"),
    ("ui_icon_error", 64, 64, 4_500, "Error icon"),
    ("ui_icon_info", 64, 64, 4_200, "Info icon"),
];

/// Format of every stock asset.
const STOCK_FORMAT: &str = "png";

/// Build the stock catalog: 5 backgrounds, 8 characters and 8 UI pieces.
///
/// Sources follow `{category}/{id}.{format}`, relative to the asset root.
#[must_use]
pub fn stock_catalog() -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    let groups = [
        (Category::Background, &BACKGROUNDS[..]),
        (Category::Character, &CHARACTERS[..]),
        (Category::Ui, &UI[..]),
    ];
    for (category, entries) in groups {
        for &(id, width, height, byte_size, description) in entries {
            catalog.register(
                AssetMetadata::new(
                    id,
                    category,
                    STOCK_FORMAT,
                    byte_size,
                    format!("{category}/{id}.{STOCK_FORMAT}"),
                )
                .with_dimensions(width, height)
                .with_description(description),
            );
        }
    }
    catalog
}
