pub mod giving_record;
pub mod waitlist;
