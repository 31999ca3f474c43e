use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormPayload {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Field name/value pairs in form order.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("message", self.message.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_in_form_order() {
        let p = FormPayload::new("Ada", "ada@example.com", "Hello");
        let names: Vec<_> = p.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, ["name", "email", "message"]);
        assert_eq!(p.fields()[1].1, "ada@example.com");
    }
}
