pub mod args;
pub mod decode;
pub mod serializers;
pub mod value;
