pub mod home_rto;
