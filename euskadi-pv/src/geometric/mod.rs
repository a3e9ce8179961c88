pub mod municipality;
