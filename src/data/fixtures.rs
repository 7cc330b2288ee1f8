// Small in-memory input tables shared by the unit tests.
//
// Store 3 has no competition data and store 4 has no store row at
// all, so both the imputation rules and the unmatched-join path get
// exercised.

pub const TRAIN_CSV: &str = "\
Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday
1,5,2015-07-31,5263,555,1,1,0,1
2,5,2015-07-31,6064,625,1,1,0,1
3,4,2015-07-30,8314,821,1,1,a,0
1,3,2015-01-01,0,0,0,0,b,1
2,2,2014-12-30,4422,500,1,0,0,0
4,2,2014-12-30,3000,300,1,0,c,0
";

pub const STORE_CSV: &str = "\
Store,StoreType,Assortment,CompetitionDistance,CompetitionOpenSinceMonth,CompetitionOpenSinceYear,Promo2,Promo2SinceWeek,Promo2SinceYear,PromoInterval
1,c,a,1270,9,2008,0,,,
2,a,a,570,11,2007,1,13,2010,\"Jan,Apr,Jul,Oct\"
3,a,c,,,,1,14,2011,\"Feb,May,Aug,Nov\"
";

/// A longer train table: `days` consecutive dates for each of the
/// three stores above, with sales that depend on store and promo.
pub fn train_csv_with_days(days: usize) -> String {
    use chrono::{Duration, NaiveDate};

    let start = NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid date");
    let mut out = String::from(
        "Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday\n",
    );
    for d in 0..days {
        let date = start + Duration::days(d as i64);
        let promo = d % 3 == 0;
        for store in 1..=3u32 {
            let sales = 1.0 + store as f64 * 0.5 + if promo { 0.8 } else { 0.0 };
            out.push_str(&format!(
                "{store},{},{},{sales},{},1,{},0,0\n",
                d % 7 + 1,
                date.format("%Y-%m-%d"),
                store * 100,
                u8::from(promo),
            ));
        }
    }
    out
}
