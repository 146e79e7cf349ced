mod ids;
mod output;
mod parameters;
mod results;

pub use ids::GroupId;
pub use output::OutputShape;
pub use parameters::{Parameter, ParameterSpace};
pub use results::{GroupSummary, MorrisResult};
