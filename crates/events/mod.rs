pub mod queue_publisher;
