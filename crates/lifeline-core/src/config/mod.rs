use serde_json::{Map, Value, json};

/// Loosely typed diagram configuration (a JSON object addressed by dotted paths).
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig(Value);

impl Default for DiagramConfig {
    fn default() -> Self {
        Self(default_config())
    }
}

/// Built-in defaults every override is merged onto.
pub fn default_config() -> Value {
    json!({
        "paper": {
            "width": 800,
            "height": 600,
            "background": "#F3F7F6",
            "border": "1px solid #E5E5E5",
            "moveThreshold": 5
        },
        "interaction": {
            "messagePadding": 20,
            "embeddedPadding": 20,
            "freePadding": 10
        },
        "group": {
            "padding": 10
        },
        "role": {
            "width": 100,
            "height": 80,
            "fontSize": 18,
            "fontFamily": "sans-serif"
        },
        "message": {
            "color": "#4666E5",
            "fontSize": 12,
            "fontFamily": "sans-serif"
        }
    })
}

impl DiagramConfig {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut cfg = Self::default();
        cfg.deep_merge(overrides);
        cfg
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.get(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_i64().map(|n| n as f64))
            .or_else(|| v.as_u64().map(|n| n as f64))
            .filter(|n| n.is_finite())
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    pub fn paper(&self) -> PaperConfig {
        let d = PaperConfig::default();
        PaperConfig {
            width: self.get_f64("paper.width").unwrap_or(d.width),
            height: self.get_f64("paper.height").unwrap_or(d.height),
            background: self
                .get_str("paper.background")
                .map(str::to_string)
                .unwrap_or(d.background),
            border: self
                .get_str("paper.border")
                .map(str::to_string)
                .unwrap_or(d.border),
            move_threshold: self
                .get("paper.moveThreshold")
                .and_then(Value::as_u64)
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(d.move_threshold),
        }
    }

    pub fn interaction(&self) -> InteractionConfig {
        let d = InteractionConfig::default();
        InteractionConfig {
            message_padding: self
                .get_f64("interaction.messagePadding")
                .unwrap_or(d.message_padding),
            embedded_padding: self
                .get_f64("interaction.embeddedPadding")
                .unwrap_or(d.embedded_padding),
            free_padding: self
                .get_f64("interaction.freePadding")
                .unwrap_or(d.free_padding),
            move_threshold: self.paper().move_threshold,
        }
    }

    pub fn shapes(&self) -> ShapeDefaults {
        let d = ShapeDefaults::default();
        ShapeDefaults {
            group_padding: self.get_f64("group.padding").unwrap_or(d.group_padding),
            role_width: self.get_f64("role.width").unwrap_or(d.role_width),
            role_height: self.get_f64("role.height").unwrap_or(d.role_height),
            role_font_size: self.get_f64("role.fontSize").unwrap_or(d.role_font_size),
            role_font_family: self
                .get_str("role.fontFamily")
                .map(str::to_string)
                .unwrap_or(d.role_font_family),
            message_color: self
                .get_str("message.color")
                .map(str::to_string)
                .unwrap_or(d.message_color),
            message_font_size: self
                .get_f64("message.fontSize")
                .unwrap_or(d.message_font_size),
            message_font_family: self
                .get_str("message.fontFamily")
                .map(str::to_string)
                .unwrap_or(d.message_font_family),
        }
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaperConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub border: String,
    pub move_threshold: u32,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#F3F7F6".to_string(),
            border: "1px solid #E5E5E5".to_string(),
            move_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Keeps dragged messages this far from the ends of their lifeline.
    pub message_padding: f64,
    /// Horizontal band inset for elements embedded in a group.
    pub embedded_padding: f64,
    pub free_padding: f64,
    /// Pointer moves swallowed before a drag starts.
    pub move_threshold: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            message_padding: 20.0,
            embedded_padding: 20.0,
            free_padding: 10.0,
            move_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDefaults {
    pub group_padding: f64,
    pub role_width: f64,
    pub role_height: f64,
    pub role_font_size: f64,
    pub role_font_family: String,
    pub message_color: String,
    pub message_font_size: f64,
    pub message_font_family: String,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            group_padding: 10.0,
            role_width: 100.0,
            role_height: 80.0,
            role_font_size: 18.0,
            role_font_family: "sans-serif".to_string(),
            message_color: crate::shape::DEFAULT_MESSAGE_COLOR.to_string(),
            message_font_size: 12.0,
            message_font_family: "sans-serif".to_string(),
        }
    }
}
