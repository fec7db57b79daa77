use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenericResponse(serde_json::Value);

impl GenericResponse {
    #[inline(always)]
    pub fn look_up<'a>(&'a self, p: &str) -> Option<&'a serde_json::Value> {
        self.0.pointer(p)
    }

    /// string at JSON pointer `p`
    pub fn look_up_str<'a>(&'a self, p: &str) -> Option<&'a str> {
        self.look_up(p).and_then(|v| v.as_str())
    }
}
