mod perceptron;
pub use self::perceptron::Perceptron;

mod model;
pub use self::model::PerceptronModel;
