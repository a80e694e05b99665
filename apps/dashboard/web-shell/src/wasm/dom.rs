use super::*;

/// The prompt editor may be either an `<input>` or a `<textarea>`.
#[derive(Clone)]
enum TextControl {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl TextControl {
    fn from_element(element: Element, id: &str) -> Result<Self, DashboardError> {
        match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(text_area) => Ok(Self::TextArea(text_area)),
            Err(element) => element
                .dyn_into::<HtmlInputElement>()
                .map(Self::Input)
                .map_err(|_| DashboardError::dom(format!("#{id} is not an input or textarea"))),
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Input(input) => input.value(),
            Self::TextArea(text_area) => text_area.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Self::Input(input) => input.set_value(value),
            Self::TextArea(text_area) => text_area.set_value(value),
        }
    }
}

#[derive(Clone)]
pub(super) struct DomView {
    prompt: TextControl,
    save_message: HtmlElement,
    log_lines: HtmlInputElement,
    logs: HtmlElement,
}

impl DomView {
    pub(super) fn locate(document: &Document, ids: &ElementIds) -> Result<Self, DashboardError> {
        let prompt = TextControl::from_element(
            required_element(document, &ids.prompt_text)?,
            &ids.prompt_text,
        )?;
        let save_message = required_element(document, &ids.save_message)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DashboardError::dom(format!("#{} is not an HtmlElement", ids.save_message)))?;
        let log_lines = required_element(document, &ids.log_lines)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| DashboardError::dom(format!("#{} is not an input", ids.log_lines)))?;
        let logs = required_element(document, &ids.logs_display)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DashboardError::dom(format!("#{} is not an HtmlElement", ids.logs_display)))?;

        Ok(Self {
            prompt,
            save_message,
            log_lines,
            logs,
        })
    }
}

impl DashboardView for DomView {
    fn prompt_text(&self) -> String {
        self.prompt.value()
    }

    fn set_prompt_text(&self, text: &str) {
        self.prompt.set_value(text);
    }

    fn set_status_message(&self, text: &str) {
        self.save_message.set_text_content(Some(text));
    }

    fn log_lines_input(&self) -> String {
        self.log_lines.value()
    }

    fn logs_text(&self) -> String {
        self.logs.text_content().unwrap_or_default()
    }

    fn set_logs_text(&self, text: &str) {
        self.logs.set_text_content(Some(text));
    }

    fn scroll_logs_to_bottom(&self) {
        self.logs.set_scroll_top(self.logs.scroll_height());
    }
}

pub(super) fn bind_controls(
    document: &Document,
    ids: &ElementIds,
    controls: &Controls,
) -> Result<(), DashboardError> {
    let save_button = required_element(document, &ids.save_button)?;
    let reload_button = required_element(document, &ids.reload_button)?;
    let refresh_button = required_element(document, &ids.refresh_logs_button)?;
    let preset_buttons = document
        .query_selector_all(&ids.preset_button_selector)
        .map_err(|_| {
            DashboardError::dom(format!(
                "invalid preset selector {}",
                ids.preset_button_selector
            ))
        })?;

    CLICK_HANDLERS.with(|slot| {
        let mut handlers = slot.borrow_mut();
        if !handlers.is_empty() {
            return Ok(());
        }

        let save = controls.clone();
        handlers.push(on_click(&save_button, move || save.save_prompt())?);
        let reload = controls.clone();
        handlers.push(on_click(&reload_button, move || reload.load_prompt())?);
        let refresh = controls.clone();
        handlers.push(on_click(&refresh_button, move || refresh.load_logs())?);

        for index in 0..preset_buttons.length() {
            let Some(button) = preset_buttons
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let Some(preset) = button.get_attribute(&ids.preset_attribute) else {
                tracing::warn!(index, "preset button has no {} attribute", ids.preset_attribute);
                continue;
            };
            let apply = controls.clone();
            handlers.push(on_click(&button, move || apply.apply_preset(preset.clone()))?);
        }

        tracing::debug!(handlers = handlers.len(), "dashboard controls bound");
        Ok(())
    })
}

fn on_click(
    target: &Element,
    mut action: impl FnMut() + 'static,
) -> Result<Closure<dyn FnMut(web_sys::Event)>, DashboardError> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
        action();
    }));
    target
        .add_event_listener_with_callback(CLICK_EVENT, callback.as_ref().unchecked_ref())
        .map_err(|_| DashboardError::dom("failed to attach click handler"))?;
    Ok(callback)
}

fn required_element(document: &Document, id: &str) -> Result<Element, DashboardError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DashboardError::dom(format!("missing #{id}")))
}
