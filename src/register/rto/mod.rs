pub mod register_rto;
