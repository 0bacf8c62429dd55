/*!
 * Main test entry point for the accessgen test suite
 */

// Import common test utilities
pub mod common;

// Import integration tests
mod integration {
    // End-to-end generation pipeline tests
    pub mod generation_pipeline_tests;

    // Result serialization contract tests
    pub mod result_contract_tests;
}
