use listing_clean::{
    clean::{clean, drop_missing_ratings, fill_default_features, normalize_descriptions},
    config::CleanOptions,
    table::{Cell, Table},
};
use proptest::prelude::*;

const HEADERS: [&str; 8] = [
    "ID",
    "Description",
    "Cleanliness_rating",
    "Location_rating",
    "guests",
    "beds",
    "bathrooms",
    "bedrooms",
];

#[derive(Debug, Clone)]
struct Listing {
    ratings: [Option<f64>; 2],
    description: Option<String>,
    features: [Option<f64>; 4],
}

fn to_table(listings: &[Listing]) -> Table {
    let mut table = Table::new(HEADERS.map(String::from).to_vec());
    for (id, listing) in listings.iter().enumerate() {
        let mut row = vec![Cell::Number(id as f64)];
        row.push(
            listing
                .description
                .clone()
                .map(Cell::Text)
                .unwrap_or(Cell::Null),
        );
        row.extend(listing.ratings.iter().map(number_or_null));
        row.extend(listing.features.iter().map(number_or_null));
        table.push_row(row).expect("row width");
    }
    table
}

fn number_or_null(value: &Option<f64>) -> Cell {
    value.map(Cell::Number).unwrap_or(Cell::Null)
}

fn quoted(fragment: &str) -> String {
    format!("'{fragment}'")
}

fn description_strategy() -> impl Strategy<Value = Option<String>> {
    let list = proptest::collection::vec(
        prop_oneof![Just(String::new()), "[A-Za-z][A-Za-z ]{0,12}"],
        0..5,
    )
    .prop_map(|fragments| {
        let body = fragments
            .iter()
            .map(|f| quoted(f))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{body}]")
    });
    prop_oneof![
        4 => list.prop_map(Some),
        1 => "[a-z ]{1,10}".prop_map(Some),
        1 => Just(None),
    ]
}

fn value_strategy() -> impl Strategy<Value = Option<f64>> {
    proptest::option::weighted(0.8, 1.0f64..10.0)
}

fn listing_strategy() -> impl Strategy<Value = Listing> {
    (
        [value_strategy(), value_strategy()],
        description_strategy(),
        [
            value_strategy(),
            value_strategy(),
            value_strategy(),
            value_strategy(),
        ],
    )
        .prop_map(|(ratings, description, features)| Listing {
            ratings,
            description,
            features,
        })
}

fn ids(table: &Table) -> Vec<f64> {
    let idx = table.column_index("ID").expect("ID column");
    table
        .column(idx)
        .map(|cell| match cell {
            Cell::Number(id) => *id,
            other => panic!("unexpected id {other:?}"),
        })
        .collect()
}

#[test]
fn listing_descriptions_follow_documented_scenarios() {
    let listings = vec![
        Listing {
            ratings: [Some(4.0), Some(5.0)],
            description: Some("['About this space', 'Cozy flat', '']".into()),
            features: [Some(2.0), None, Some(1.0), Some(1.0)],
        },
        Listing {
            ratings: [Some(4.0), Some(5.0)],
            description: Some("['About this space']".into()),
            features: [Some(2.0); 4],
        },
        Listing {
            ratings: [Some(4.0), Some(5.0)],
            description: Some("not a list".into()),
            features: [Some(2.0); 4],
        },
        Listing {
            ratings: [None, Some(5.0)],
            description: Some("['About this space', 'Unrated']".into()),
            features: [Some(2.0); 4],
        },
    ];

    let cleaned = clean(to_table(&listings), &CleanOptions::default());

    assert_eq!(ids(&cleaned), vec![0.0]);
    assert_eq!(cleaned.cell(0, "Description"), Some(&Cell::text("Cozy flat")));
    assert_eq!(cleaned.cell(0, "beds"), Some(&Cell::Number(1.0)));
    assert_eq!(cleaned.cell(0, "guests"), Some(&Cell::Number(2.0)));
}

#[test]
fn stages_compose_like_the_pipeline() {
    let listings = vec![
        Listing {
            ratings: [Some(3.0), None],
            description: Some("['About this space', 'x']".into()),
            features: [None; 4],
        },
        Listing {
            ratings: [Some(3.0), Some(3.0)],
            description: Some("('About this space', 'Tuple', 'form')".into()),
            features: [None; 4],
        },
    ];
    let options = CleanOptions::default();
    let table = to_table(&listings);

    let staged = fill_default_features(
        normalize_descriptions(
            drop_missing_ratings(table.clone(), &options.rating_marker),
            &options.description_column,
        ),
        &options.default_columns,
        options.default_value,
    );

    assert_eq!(staged, clean(table, &options));
    assert_eq!(staged.cell(0, "Description"), Some(&Cell::text("Tupleform")));
}

proptest! {
    #[test]
    fn cleaned_rows_satisfy_output_invariants(
        listings in proptest::collection::vec(listing_strategy(), 0..25)
    ) {
        let cleaned = clean(to_table(&listings), &CleanOptions::default());

        let kept = ids(&cleaned);
        prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));

        for row in 0..cleaned.row_count() {
            for rating in ["Cleanliness_rating", "Location_rating"] {
                prop_assert!(!cleaned.cell(row, rating).unwrap().is_null());
            }
            match cleaned.cell(row, "Description").unwrap() {
                Cell::Text(text) => {
                    prop_assert!(!text.is_empty());
                    prop_assert!(!text.contains(['[', ']', '\'']));
                }
                other => prop_assert!(false, "unexpected description {other:?}"),
            }
            let source = kept[row] as usize;
            for (offset, feature) in ["guests", "beds", "bathrooms", "bedrooms"].iter().enumerate() {
                let value = cleaned.cell(row, feature).unwrap();
                let expected = listings[source].features[offset].unwrap_or(1.0);
                prop_assert_eq!(value, &Cell::Number(expected));
            }
        }
    }

    #[test]
    fn rating_filter_and_default_fill_are_idempotent(
        listings in proptest::collection::vec(listing_strategy(), 0..25)
    ) {
        let options = CleanOptions::default();
        let once = drop_missing_ratings(to_table(&listings), &options.rating_marker);
        let twice = drop_missing_ratings(once.clone(), &options.rating_marker);
        prop_assert_eq!(&once, &twice);

        let filled = fill_default_features(once, &options.default_columns, 1.0);
        let refilled = fill_default_features(filled.clone(), &options.default_columns, 1.0);
        prop_assert_eq!(filled, refilled);
    }
}
