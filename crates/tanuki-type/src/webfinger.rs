use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Link {
    pub rel: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Resource {
    pub subject: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}
