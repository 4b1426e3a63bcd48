//! Built-in seed timetable.
//!
//! Carried over verbatim from the original catalog, including the
//! repeated train number 11078 and the balances that exceed the seat
//! totals on 12001 and 12634. Cleaning those up would silently change
//! user-visible data; the store treats the number as non-unique and
//! never clamps balances.

use crate::models::TrainRecord;
use crate::time::ScheduleTime;

type SeedRow = (u32, &'static str, &'static str, &'static str, &'static str, &'static str, u32, u32);

#[rustfmt::skip]
const SEED: &[SeedRow] = &[
    (12951, "Rajdhani Express", "Mumbai Central", "New Delhi", "16:35", "08:35", 1200, 1200),
    (12001, "Shatabdi Express", "New Delhi", "Kalka", "06:00", "11:10", 600, 6000),
    (12245, "Duronto Express", "Howrah", "Yesvantpur", "20:00", "04:30", 800, 800),
    (12909, "Garib Rath Express", "Bandra Terminus", "Nizamuddin", "16:55", "09:40", 700, 700),
    (22438, "Humsafar Express", "Allahabad", "Anand Vihar", "22:10", "04:00", 1000, 1000),
    (12050, "Gatimaan Express", "New Delhi", "Jhansi", "08:10", "10:48", 500, 500),
    (22672, "Tejas Express", "Madurai", "Chennai Egmore", "15:00", "21:15", 500, 500),
    (12072, "Jan Shatabdi Express", "Jalna", "Mumbai CST", "05:50", "12:00", 300, 300),
    (12651, "Sampark Kranti Express", "Madurai", "Nizamuddin", "05:15", "10:40", 700, 700),
    (12081, "Jan Shatabdi Express", "Kannur", "Thiruvananthapuram", "14:55", "20:45", 400, 40),
    (11020, "Konark Express", "Bhubaneswar", "Mumbai CST", "15:25", "03:45", 800, 800),
    (12634, "Kanyakumari Express", "Hazrat Nizamuddin", "Kanyakumari", "17:20", "03:10", 700, 720),
    (11078, "Jhelum Express", "Jammu Tawi", "Pune", "21:45", "08:05", 600, 600),
    (11057, "Amritsar Express", "Mumbai CST", "Amritsar", "23:30", "08:30", 400, 400),
    (12436, "Dibrugarh Rajdhani Express", "New Delhi", "Dibrugarh", "16:25", "05:35", 1000, 1000),
    (12301, "Howrah Rajdhani Express", "Howrah", "New Delhi", "16:55", "10:00", 1200, 1200),
    (12015, "Ajmer Shatabdi Express", "New Delhi", "Ajmer", "06:05", "12:45", 600, 600),
    (12626, "Kerala Express", "New Delhi", "Trivandrum", "13:15", "19:15", 900, 900),
    (12401, "Nanda Devi Express", "Dehradun", "New Delhi", "22:50", "05:15", 500, 500),
    (14801, "Bhagat Ki Kothi Express", "Jodhpur", "Bhagat Ki Kothi", "23:45", "08:30", 600, 600),
    (11301, "Udyan Express", "Mumbai CST", "Bangalore", "20:30", "08:50", 800, 800),
    (12311, "Kalka Mail", "Howrah", "Kalka", "19:40", "04:30", 700, 700),
    (15906, "Vivek Express", "Dibrugarh", "Kanyakumari", "23:45", "22:00", 900, 900),
    (12260, "Sealdah Duronto Express", "Sealdah", "Bikaner", "12:50", "11:10", 800, 800),
    (22921, "Bandra Terminus - Gorakhpur Humsafar Exp", "Bandra Terminus", "Gorakhpur", "23:25", "07:25", 1000, 1000),
    (11043, "Lokmanya Tilak - Madurai Express", "Lokmanya Tilak", "Madurai", "00:15", "05:30", 700, 700),
    (22501, "KSR Bengaluru - New Tinsukia Express", "Bangalore", "New Tinsukia", "03:10", "19:15", 800, 800),
    (11078, "Jammu Tawi - Pune Jhelum Express", "Jammu Tawi", "Pune", "21:45", "08:15", 500, 500),
    (16317, "Kochuveli - Amritsar Express", "Kochuveli", "Amritsar", "04:50", "21:25", 600, 600),
    (52541, "New Jalpaiguri - Darjeeling Express", "New Jalpaiguri", "Darjeeling", "09:10", "16:30", 400, 400),
    (12682, "Pandian Express", "Madurai", "Chennai Egmore", "20:00", "04:30", 800, 800),
    (16127, "Kanyakumari Express", "Kanyakumari", "Chennai Egmore", "14:55", "22:45", 900, 900),
    (12660, "Vaigai Express", "Madurai", "Chennai Egmore", "05:00", "09:45", 700, 700),
    (16859, "Mysuru - Chennai Express", "Mysuru", "Chennai Egmore", "18:30", "22:30", 600, 600),
];

/// Materialize the seed timetable in its original order.
pub(super) fn seed_records() -> Vec<TrainRecord> {
    SEED.iter()
        .map(|&(number, name, source, destination, start, reach, total_seats, balance)| {
            TrainRecord {
                number,
                name: name.to_string(),
                source: source.to_string(),
                destination: destination.to_string(),
                start_time: ScheduleTime::parse(start).expect("seed start time is valid HH:MM"),
                reach_time: ScheduleTime::parse(reach).expect("seed reach time is valid HH:MM"),
                total_seats,
                balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_34_trains() {
        assert_eq!(seed_records().len(), 34);
    }

    #[test]
    fn seed_keeps_duplicate_11078() {
        let count = seed_records()
            .iter()
            .filter(|record| record.number == 11078)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn seed_keeps_overfull_balances() {
        let records = seed_records();
        let shatabdi = records
            .iter()
            .find(|record| record.number == 12001)
            .unwrap();
        assert!(shatabdi.balance > shatabdi.total_seats);
    }
}
