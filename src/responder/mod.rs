pub mod generator;
pub mod prompt;

pub use generator::ResponseGenerator;
pub use prompt::PromptTemplate;
