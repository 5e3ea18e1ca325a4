pub mod diff;
pub mod feature;
pub mod run;
