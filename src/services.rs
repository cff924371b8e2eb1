pub mod account_service;
pub mod itinerary_generation_service;
pub mod openai_service;
pub mod plan_service;
pub mod prompt_builder;
pub mod response_parser;
