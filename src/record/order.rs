// ABOUTME: Orders group the containers handled for one customer request.
// ABOUTME: An order always references at least one container.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::types::ContainerNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub customer_code: String,
    containers: NonEmpty<ContainerNumber>,
}

impl Order {
    pub fn new(
        order_number: impl Into<String>,
        customer_code: impl Into<String>,
        first: ContainerNumber,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            customer_code: customer_code.into(),
            containers: NonEmpty::new(first),
        }
    }

    /// Add a container; returns false if the order already holds it.
    pub fn add(&mut self, number: ContainerNumber) -> bool {
        if self.contains(&number) {
            return false;
        }
        self.containers.push(number);
        true
    }

    pub fn contains(&self, number: &ContainerNumber) -> bool {
        self.containers.iter().any(|n| n == number)
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerNumber> {
        self.containers.iter()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }
}
