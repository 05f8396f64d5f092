pub mod reassessment;
