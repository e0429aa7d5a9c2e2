//! Built-in physical quantities catalog
//!
//! Four categories and the level table that ships with the game, used when
//! no content pack is given. Distractors for a level are the other
//! categories' labels, minus anything that also belongs to the target.

use std::collections::HashMap;

use super::pack::{ContentPack, ExpressionRecord, GameRecord, LevelRecord};
use crate::settings::{KEY_ITEM_SPEED, KEY_MAX_ITEMS, KEY_WRONG_PERCENTAGE, SettingsOverrides};

pub const BUILTIN_GAME_ID: u32 = 1;
pub const BUILTIN_GAME_NAME: &str = "Fiziksel Büyüklükler";

pub const BASE: &str = "Temel Büyüklükler";
pub const DERIVED: &str = "Türetilmiş Büyüklükler";
pub const SCALAR: &str = "Skaler Büyüklükler";
pub const VECTOR: &str = "Vektörel Büyüklükler";

pub const BASE_QUANTITIES: &[&str] = &[
    "Kütle",
    "Işık Şiddeti",
    "Sıcaklık",
    "Akım Şiddeti",
    "Madde Miktarı",
    "Uzunluk",
    "Zaman",
];

pub const DERIVED_QUANTITIES: &[&str] = &[
    "Hız",
    "İvme",
    "Kuvvet",
    "Enerji",
    "Güç",
    "Basınç",
    "Frekans",
    "Alan",
    "Ağırlık",
    "Elektrik Alan",
    "Hacim",
    "Isı",
    "Manyetik Alan",
    "Tork",
    "Momentum",
    "Sürat",
    "Yer Değiştirme",
    "Özkütle",
    "Yüzey Alanı",
    "Özısı",
    "İş",
];

pub const SCALAR_QUANTITIES: &[&str] = &[
    "Sürat",
    "Alınan Yol",
    "Kütle",
    "Hacim",
    "Özkütle",
    "Sıcaklık",
    "Enerji",
    "Işık Şiddeti",
    "Akım Şiddeti",
    "Madde Miktarı",
    "Uzunluk",
    "Zaman",
    "Alan",
    "Basınç",
    "Güç",
    "Isı",
    "Yüzey Alanı",
    "Özısı",
    "İş",
];

pub const VECTOR_QUANTITIES: &[&str] = &[
    "Hız",
    "Yer Değiştirme",
    "Kuvvet",
    "Ağırlık",
    "İvme",
    "Konum",
    "Tork",
    "Elektrik Alan",
    "Manyetik Alan",
    "Momentum",
];

/// Category order used when collecting distractors
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (BASE, BASE_QUANTITIES),
    (DERIVED, DERIVED_QUANTITIES),
    (SCALAR, SCALAR_QUANTITIES),
    (VECTOR, VECTOR_QUANTITIES),
];

/// Level number -> target category
pub const LEVEL_TARGETS: &[(u32, &str)] = &[(1, BASE), (2, DERIVED), (3, SCALAR), (4, VECTOR)];

fn quantities_of(category: &str) -> &'static [&'static str] {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, items)| *items)
        .unwrap_or(&[])
}

/// Distractors for a target category: every other category's label that is
/// not also a correct item, first occurrence wins
pub fn cross_category_distractors(target: &str) -> Vec<(&'static str, &'static str)> {
    let correct = quantities_of(target);
    let mut out: Vec<(&'static str, &'static str)> = Vec::new();
    for (category, items) in CATEGORIES {
        if *category == target {
            continue;
        }
        for item in *items {
            if correct.contains(item) || out.iter().any(|(text, _)| text == item) {
                continue;
            }
            out.push((*item, *category));
        }
    }
    out
}

/// The shipped game as a content pack
pub fn catalog_pack() -> ContentPack {
    let levels = LEVEL_TARGETS
        .iter()
        .map(|&(level_number, target)| {
            let mut expressions: Vec<ExpressionRecord> = quantities_of(target)
                .iter()
                .map(|item| ExpressionRecord {
                    expression: item.to_string(),
                    is_correct: true,
                    category: None,
                })
                .collect();
            expressions.extend(cross_category_distractors(target).into_iter().map(
                |(item, category)| ExpressionRecord {
                    expression: item.to_string(),
                    is_correct: false,
                    category: Some(category.to_string()),
                },
            ));
            LevelRecord {
                level_number,
                level_name: target.to_string(),
                level_description: String::new(),
                overrides: SettingsOverrides::default(),
                expressions,
            }
        })
        .collect();

    let settings: HashMap<String, serde_json::Value> = [
        (KEY_WRONG_PERCENTAGE, "30.0"),
        (KEY_ITEM_SPEED, "3.0"),
        (KEY_MAX_ITEMS, "5"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
    .collect();

    ContentPack {
        games: vec![GameRecord {
            id: BUILTIN_GAME_ID,
            name: BUILTIN_GAME_NAME.to_string(),
            description: String::new(),
            settings,
            levels,
        }],
    }
}
