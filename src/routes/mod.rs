mod article;
mod home;
mod profile;
mod settings;

pub use article::Article;
pub use home::HomePage;
pub use profile::Profile;
