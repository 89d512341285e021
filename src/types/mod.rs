// ABOUTME: Validated domain types for container depot operations.
// ABOUTME: Container numbers are checked once here and trusted everywhere else.

mod container_number;

pub use container_number::{
    CHECK_DIGIT_PREFIX_LEN, CONTAINER_NUMBER_LEN, ContainerNumber, ContainerNumberError,
    check_digit,
};
