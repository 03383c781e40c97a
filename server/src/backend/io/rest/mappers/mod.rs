pub mod giving_mapper;
pub mod handle_mapper;
