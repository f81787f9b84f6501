//! Room-overlap matching.
//!
//! Intervals are closed on both ends. A query and a room are compared only
//! on the axes both of them carry:
//!
//! | query axes | room axes | outcome                                  |
//! |------------|-----------|------------------------------------------|
//! | both       | both      | `FULL` if both overlap, else no match    |
//! | any        | any       | `PARTIAL` (`GRIDLINE`) if every shared   |
//! |            |           | axis overlaps, else no match             |
//! | no shared axis         || no match                                 |

use std::cmp::Ordering;

use fab_locate_location_models::{GridBounds, LocationRecord, MatchType, RoomMatch};

/// Whether two closed intervals intersect.
#[must_use]
pub fn intervals_overlap<T: PartialOrd>(a: (T, T), b: (T, T)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Classifies how `room` matches `query`, or `None` when it does not.
///
/// `gridline` marks queries that came from a `GL-` reference; their
/// single-axis matches are reported as [`MatchType::Gridline`].
#[must_use]
pub fn classify<Q, R>(query: &Q, gridline: bool, room: &R) -> Option<MatchType>
where
    Q: GridBounds + ?Sized,
    R: GridBounds + ?Sized,
{
    let rows = query.row_span().zip(room.row_span());
    let cols = query.col_span().zip(room.col_span());

    let rows_ok = rows.map(|(q, r)| intervals_overlap(q, r));
    let cols_ok = cols.map(|(q, r)| intervals_overlap(q, r));

    match (rows_ok, cols_ok) {
        (Some(true), Some(true)) => Some(MatchType::Full),
        (Some(false), _) | (_, Some(false)) | (None, None) => None,
        (Some(true), None) | (None, Some(true)) => Some(if gridline {
            MatchType::Gridline
        } else {
            MatchType::Partial
        }),
    }
}

/// Result ordering: `FULL` first, then by location code.
#[must_use]
pub fn compare_matches(a: &RoomMatch, b: &RoomMatch) -> Ordering {
    let rank = |m: &RoomMatch| u8::from(m.match_type != MatchType::Full);
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.location_code.cmp(&b.location_code))
}

/// Matches `query` against every candidate room and returns the sorted
/// matches.
#[must_use]
pub fn match_rooms<'a, Q, I>(query: &Q, gridline: bool, rooms: I) -> Vec<RoomMatch>
where
    Q: GridBounds + ?Sized,
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut matches: Vec<RoomMatch> = rooms
        .into_iter()
        .filter_map(|room| {
            classify(query, gridline, room).map(|match_type| RoomMatch {
                location_code: room.location_code.clone(),
                room_name: room.room_name.clone(),
                match_type,
            })
        })
        .collect();
    matches.sort_by(compare_matches);
    matches
}

#[cfg(test)]
mod tests {
    use fab_locate_location_models::{GridRow, GridSpec, LocationType};
    use proptest::prelude::*;

    use super::*;

    fn row(s: &str) -> GridRow {
        s.parse().unwrap()
    }

    fn room(code: &str, rows: Option<(&str, &str)>, cols: Option<(f64, f64)>) -> LocationRecord {
        let mut record = LocationRecord::new(0, code, LocationType::Room);
        if let Some((a, b)) = rows {
            record = record.with_rows(row(a), row(b));
        }
        if let Some((a, b)) = cols {
            record = record.with_cols(a, b);
        }
        record
    }

    fn query(rows: Option<(&str, &str)>, cols: Option<(f64, f64)>, gridline: bool) -> GridSpec {
        GridSpec::from_bounds("q", rows.map(|(a, b)| (row(a), row(b))), cols, gridline)
    }

    #[test]
    fn closed_intervals_touching_at_an_edge_overlap() {
        assert!(intervals_overlap((1.0, 10.0), (10.0, 12.0)));
        assert!(!intervals_overlap((1.0, 9.5), (10.0, 12.0)));
        assert!(intervals_overlap((row("C"), row("C")), (row("A"), row("C"))));
    }

    #[test]
    fn full_requires_both_axes() {
        let r1 = room("R1", Some(("A", "C")), Some((1.0, 10.0)));
        assert_eq!(
            classify(&query(Some(("B", "B")), Some((5.0, 5.0)), false), false, &r1),
            Some(MatchType::Full)
        );
        assert_eq!(
            classify(&query(Some(("B", "B")), Some((15.0, 15.0)), false), false, &r1),
            None
        );
    }

    #[test]
    fn missing_axis_compares_the_shared_one() {
        let r1 = room("R1", Some(("A", "C")), Some((1.0, 10.0)));
        let rows_only = query(Some(("B", "B")), None, false);
        assert_eq!(classify(&rows_only, false, &r1), Some(MatchType::Partial));

        let cols_only_room = room("R3", None, Some((1.0, 10.0)));
        let point = query(Some(("B", "B")), Some((5.0, 5.0)), false);
        assert_eq!(classify(&point, false, &cols_only_room), Some(MatchType::Partial));

        let rows_only_room = room("R4", Some(("A", "C")), None);
        let cols_only = query(None, Some((5.0, 5.0)), false);
        assert_eq!(classify(&cols_only, false, &rows_only_room), None);
    }

    #[test]
    fn gridline_queries_tag_single_axis_matches() {
        let r1 = room("R1", Some(("A", "C")), Some((1.0, 10.0)));
        let gl = query(None, Some((10.0, 10.0)), true);
        assert_eq!(classify(&gl, true, &r1), Some(MatchType::Gridline));
        let gl_full = query(Some(("A", "A")), Some((10.0, 10.0)), true);
        assert_eq!(classify(&gl_full, true, &r1), Some(MatchType::Full));
    }

    #[test]
    fn two_room_fixture() {
        let rooms = [
            room("R1", Some(("A", "C")), Some((1.0, 10.0))),
            room("R2", Some(("D", "F")), Some((1.0, 10.0))),
        ];

        let point = query(Some(("B", "B")), Some((5.0, 5.0)), false);
        let matches = match_rooms(&point, false, &rooms);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].location_code, "R1");
        assert_eq!(matches[0].match_type, MatchType::Full);

        let row_b = query(Some(("B", "B")), None, false);
        let matches = match_rooms(&row_b, false, &rooms);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].location_code, "R1");
        assert_eq!(matches[0].match_type, MatchType::Partial);
    }

    #[test]
    fn full_matches_sort_first() {
        let rooms = [
            room("A-ROOM", Some(("A", "C")), None),
            room("Z-ROOM", Some(("A", "C")), Some((1.0, 10.0))),
            room("M-ROOM", Some(("B", "B")), Some((4.0, 6.0))),
        ];
        let point = query(Some(("B", "B")), Some((5.0, 5.0)), false);
        let codes: Vec<String> = match_rooms(&point, false, &rooms)
            .into_iter()
            .map(|m| m.location_code)
            .collect();
        assert_eq!(codes, ["M-ROOM", "Z-ROOM", "A-ROOM"]);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in 1.0f64..34.0, b in 1.0f64..34.0, c in 1.0f64..34.0, d in 1.0f64..34.0) {
            let x = (a.min(b), a.max(b));
            let y = (c.min(d), c.max(d));
            prop_assert_eq!(intervals_overlap(x, y), intervals_overlap(y, x));
        }
    }
}
