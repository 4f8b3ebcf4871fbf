use chrono::{Datelike, NaiveDate, Weekday};
use scrum_common::holiday::{is_weekend, BusinessDays, HolidayTable};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn table_2018() -> HolidayTable {
    HolidayTable::from_config([
        ("2018-01-01", "ca,uk,us: New Year's Day"),
        ("2018-02-19", r#"ca,us: ca:"Family Day (AB, MB, ON, PE, SK)" us:"President's Day""#),
        ("2018-03-30", "ca,uk: Good Friday"),
        ("2018-04-02", "uk: Easter Monday"),
        ("2018-07-04", "us: Independence Day"),
        ("2018-11-22", "us: Thanksgiving Day"),
        ("2018-11-23", "us: Day After Thanksgiving"),
        ("2018-12-24", "us: Christmas Eve"),
        ("2018-12-25", "ca,uk,us: Christmas Day"),
        ("2018-12-26", "ca,uk: Boxing Day"),
    ])
}

#[test]
fn new_years_weekend_per_country() {
    let table = HolidayTable::from_config([("2018-01-01", "us: New Year's Day")]);
    let friday = date("2017-12-29");
    assert_eq!(BusinessDays::new(&table, "us").next(friday).unwrap(), date("2018-01-02"));
    assert_eq!(BusinessDays::new(&table, "ca").next(friday).unwrap(), date("2018-01-01"));
}

#[test]
fn easter_long_weekend_in_the_uk() {
    let table = table_2018();
    let uk = BusinessDays::new(&table, "uk");
    assert_eq!(uk.next(date("2018-03-29")).unwrap(), date("2018-04-03"));
    assert_eq!(uk.previous(date("2018-04-03")).unwrap(), date("2018-03-29"));

    let us = BusinessDays::new(&table, "us");
    assert_eq!(us.next(date("2018-03-29")).unwrap(), date("2018-03-30"));
}

#[test]
fn thanksgiving_skips_to_monday() {
    let table = table_2018();
    let us = BusinessDays::new(&table, "us");
    assert_eq!(us.next(date("2018-11-21")).unwrap(), date("2018-11-26"));
}

#[test]
fn christmas_week() {
    let table = table_2018();
    let us = BusinessDays::new(&table, "us");
    let uk = BusinessDays::new(&table, "uk");
    assert_eq!(us.next(date("2018-12-21")).unwrap(), date("2018-12-26"));
    assert_eq!(uk.next(date("2018-12-21")).unwrap(), date("2018-12-24"));
    assert_eq!(uk.next(date("2018-12-24")).unwrap(), date("2018-12-27"));
}

#[test]
fn next_and_previous_always_land_on_business_days() {
    let table = table_2018();
    for country in ["ca", "uk", "us", "zz"] {
        let days = BusinessDays::new(&table, country);
        let mut current = date("2018-01-01");
        while current.year() == 2018 {
            let next = days.next(current).unwrap();
            let previous = days.previous(current).unwrap();
            assert!(next > current && previous < current);
            assert!(days.is_business_day(next), "{country} {next}");
            assert!(days.is_business_day(previous), "{country} {previous}");
            assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
            current = current.succ_opt().unwrap();
        }
    }
}

#[test]
fn business_days_between_steps_are_skipped_days_only() {
    let table = table_2018();
    let us = BusinessDays::new(&table, "us");
    let start = date("2018-07-03");
    let next = us.next(start).unwrap();
    let mut between = start.succ_opt().unwrap();
    while between < next {
        assert!(is_weekend(between) || table.is_observed(between, "us"));
        between = between.succ_opt().unwrap();
    }
}

#[test]
fn holiday_names_follow_country() {
    let table = table_2018();
    let ca = BusinessDays::new(&table, "ca");
    let us = BusinessDays::new(&table, "us");
    assert_eq!(
        ca.holiday(date("2018-02-19")).unwrap().name,
        "Family Day (AB, MB, ON, PE, SK)"
    );
    assert_eq!(us.holiday(date("2018-02-19")).unwrap().name, "President's Day");
    assert_eq!(us.holiday(date("2018-12-25")).unwrap().name, "Christmas Day");
    assert!(us.holiday(date("2018-12-26")).is_none());
}

#[test]
fn malformed_per_country_text_does_not_block_resolution() {
    let table = HolidayTable::from_config([("2018-02-19", r#"ca,us: ca:"Family Day" us"#)]);
    let us = BusinessDays::new(&table, "us");
    assert_eq!(us.next(date("2018-02-16")).unwrap(), date("2018-02-20"));
    assert_eq!(us.holiday(date("2018-02-19")).unwrap().name, r#"ca:"Family Day" us"#);
}
