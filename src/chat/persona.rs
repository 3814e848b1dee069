//! Persona prompt templates.

/// Persona, grounding text and image style used to build prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Opening sentence describing who the model is.
    pub role: String,
    /// Acronym every reply must start with.
    pub banner: String,
    /// Expansion of the banner acronym, shown to the model as an example.
    pub framework: String,
    /// Reference material the reply must cite.
    pub grounding: String,
    /// Style phrase appended to image prompts.
    pub image_style: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            role: "You are a creative thinker who thinks about creativity and how to be creative."
                .to_string(),
            banner: "B.E.C.R.E.A.T.I.V.E".to_string(),
            framework: "B - Be curious, E - Explore, C - Create, R - Reflect, E - Experiment, \
                        A - Ask, T - Think, I - Inspire, V - Visualize, E - Execute"
                .to_string(),
            grounding: "hitchhiker's guide to the galaxy".to_string(),
            image_style: "pop art creative style".to_string(),
        }
    }
}

impl Persona {
    /// Sets the grounding text.
    pub fn with_grounding(mut self, grounding: impl Into<String>) -> Self {
        self.grounding = grounding.into();
        self
    }

    /// Sets the image style phrase.
    pub fn with_image_style(mut self, style: impl Into<String>) -> Self {
        self.image_style = style.into();
        self
    }

    /// Builds the completion prompt around the literal `user_message`.
    pub fn chat_prompt(&self, user_message: &str) -> String {
        format!(
            "{role}\n\n\
             respond to this '{user_message}' following these instructions:\n\n\
             ## Instructions:\n\
             * provide creative ways to be creative\n\
             * always start with {banner}\n\
             * be creative in your responses\n\
             * follow the {banner} framework (e.g. {framework})\n\
             * Ground all your answers based on this book {grounding} and make sure you cite the exact phrase from that book\n",
            role = self.role,
            banner = self.banner,
            framework = self.framework,
            grounding = self.grounding,
        )
    }

    /// Builds the illustration prompt for a reply.
    pub fn image_prompt(&self, reply: &str) -> String {
        format!("A {reply} in a {}", self.image_style)
    }
}
