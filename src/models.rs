pub mod plan_request;
pub mod travel_plan;
pub mod user;
