pub mod synthetic_phase;
