//! Typewriter renderer.
//!
//! Reveals the `data-text` of the `#ai-text` element into that element, one
//! unit per tick. The animation is a plain state machine ([`Typewriter`])
//! driven by an injected [`Scheduler`]: one step runs immediately, and every
//! step is followed by one delay. Once the cursor reaches the end of the text
//! nothing else is scheduled; there is no restart and no cancellation.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::TypewriterConfig;
use crate::dom::{NodeId, Page};
use crate::markup::{LINE_BREAK, MarkupPolicy};
use crate::scheduler::Scheduler;

/// Identifier of the element the typewriter writes into.
pub const TARGET_ID: &str = "ai-text";

/// `data-*` key holding the text to reveal.
pub const TEXT_KEY: &str = "text";

/// How the text is split into units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypewriterMode {
    /// `<br>` is revealed as one line-break unit.
    #[default]
    MarkerAware,
    /// Every character is its own unit.
    Plain,
}

/// One revealed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Char(char),
    LineBreak,
}

/// Cursor over the text being revealed.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset of the next unit.
    cursor: usize,
    mode: TypewriterMode,
}

impl Typewriter {
    #[must_use]
    pub fn new(text: impl Into<String>, mode: TypewriterMode) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            mode,
        }
    }

    /// Byte offset of the next unit.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Advance past the next unit.
    pub fn next_step(&mut self) -> Option<Step> {
        let rest = self.text.get(self.cursor..).filter(|rest| !rest.is_empty())?;

        if self.mode == TypewriterMode::MarkerAware && rest.starts_with(LINE_BREAK) {
            self.cursor += LINE_BREAK.len();
            return Some(Step::LineBreak);
        }

        let ch = rest.chars().next()?;
        self.cursor += ch.len_utf8();
        Some(Step::Char(ch))
    }
}

impl Iterator for Typewriter {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.next_step()
    }
}

/// Counts from a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypewriterReport {
    pub char_steps: usize,
    pub break_steps: usize,
    /// Delays awaited; equals the number of steps.
    pub ticks: usize,
}

impl TypewriterReport {
    #[must_use]
    pub fn steps(&self) -> usize {
        self.char_steps + self.break_steps
    }
}

/// Page handles the renderer writes through.
#[derive(Debug, Clone)]
pub struct TypewriterContext {
    page: Page,
    target: NodeId,
}

/// A typewriter bound to its target element.
#[derive(Debug)]
pub struct TypewriterRenderer {
    context: TypewriterContext,
    machine: Typewriter,
    tick: Duration,
    markup: MarkupPolicy,
}

impl TypewriterRenderer {
    /// Bind to `#ai-text`. Returns `None` when the page has no such element.
    ///
    /// A target without `data-text` reveals an empty string.
    #[must_use]
    pub fn mount(page: &Page, settings: &TypewriterConfig) -> Option<Self> {
        let Some((target, text)) = page.read(|doc| {
            let target = doc.get_element_by_id(TARGET_ID)?;
            let text = doc.dataset(target, TEXT_KEY).unwrap_or_default().to_string();
            Some((target, text))
        }) else {
            debug!(name: "typewriter.mount.skipped", element = TARGET_ID, "Target element not on page");
            return None;
        };

        Some(Self {
            context: TypewriterContext {
                page: page.clone(),
                target,
            },
            machine: Typewriter::new(text, settings.mode),
            tick: settings.tick(),
            markup: settings.markup,
        })
    }

    /// Run to completion.
    pub async fn run(self, scheduler: &dyn Scheduler) -> TypewriterReport {
        self.run_with(scheduler, |_| {}).await
    }

    /// Run to completion, calling `on_step` after each unit is rendered.
    pub async fn run_with(
        mut self,
        scheduler: &dyn Scheduler,
        mut on_step: impl FnMut(Step) + Send,
    ) -> TypewriterReport {
        let mut report = TypewriterReport::default();

        while let Some(step) = self.machine.next_step() {
            let html = match step {
                Step::LineBreak => {
                    report.break_steps += 1;
                    LINE_BREAK.to_string()
                }
                Step::Char(ch) => {
                    report.char_steps += 1;
                    self.markup.render_char(ch)
                }
            };
            let target = self.context.target;
            self.context.page.write(|doc| doc.append_html(target, &html));
            on_step(step);

            scheduler.delay(self.tick).await;
            report.ticks += 1;
        }

        info!(
            name: "typewriter.finished",
            chars = report.char_steps,
            breaks = report.break_steps,
            "Typewriter finished"
        );
        report
    }

    /// Fire-and-forget variant of [`TypewriterRenderer::run`].
    pub fn spawn(self, scheduler: Arc<dyn Scheduler>) -> JoinHandle<TypewriterReport> {
        tokio::spawn(async move { self.run(scheduler.as_ref()).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::scheduler::{CountingScheduler, TokioScheduler};

    fn page_with_text(text: &str) -> (Page, NodeId) {
        let mut doc = Document::new();
        let el = doc.create_element_with_id("p", TARGET_ID);
        doc.set_dataset(el, TEXT_KEY, text);
        (Page::new(doc), el)
    }

    fn settings(mode: TypewriterMode, markup: MarkupPolicy) -> TypewriterConfig {
        TypewriterConfig {
            mode,
            markup,
            ..TypewriterConfig::default()
        }
    }

    #[test]
    fn marker_is_one_unit() {
        let steps: Vec<Step> = Typewriter::new("a<br>b", TypewriterMode::MarkerAware).collect();
        assert_eq!(
            steps,
            vec![Step::Char('a'), Step::LineBreak, Step::Char('b')]
        );
    }

    #[test]
    fn plain_mode_ignores_marker() {
        let steps = Typewriter::new("a<br>", TypewriterMode::Plain).count();
        assert_eq!(steps, 5);
    }

    #[test]
    fn cursor_reaches_end() {
        let mut machine = Typewriter::new("м'яч", TypewriterMode::MarkerAware);
        while machine.next_step().is_some() {}
        assert!(machine.is_done());
        assert_eq!(machine.cursor(), "м'яч".len());
        assert_eq!(machine.next_step(), None);
    }

    #[tokio::test]
    async fn renders_text_without_marker() {
        let text = "Slam dunk!";
        let (page, el) = page_with_text(text);
        let scheduler = CountingScheduler::new();

        let renderer =
            TypewriterRenderer::mount(&page, &settings(TypewriterMode::MarkerAware, MarkupPolicy::Raw))
                .unwrap();
        let report = renderer.run(&scheduler).await;

        assert_eq!(page.read(|doc| doc.inner_html(el).to_string()), text);
        assert_eq!(report.steps(), text.chars().count());
        assert_eq!(scheduler.ticks(), text.chars().count());
    }

    #[tokio::test]
    async fn counts_marker_steps() {
        let text = "one<br>two<br>three";
        let (page, el) = page_with_text(text);
        let scheduler = CountingScheduler::new();

        let report = TypewriterRenderer::mount(&page, &TypewriterConfig::default())
            .unwrap()
            .run(&scheduler)
            .await;

        assert_eq!(report.break_steps, 2);
        assert_eq!(report.char_steps, text.len() - 4 * 2);
        assert_eq!(report.ticks, report.steps());
        assert_eq!(scheduler.ticks(), report.steps());
        assert_eq!(page.text_content(el), "one\ntwo\nthree");
    }

    #[tokio::test]
    async fn sanitized_escapes_revealed_markup() {
        let (page, el) = page_with_text("<b>x</b><br>y");
        TypewriterRenderer::mount(&page, &TypewriterConfig::default())
            .unwrap()
            .run(&CountingScheduler::new())
            .await;

        assert_eq!(
            page.read(|doc| doc.inner_html(el).to_string()),
            "&lt;b&gt;x&lt;/b&gt;<br>y"
        );
    }

    #[test]
    fn absent_target_is_a_no_op() {
        let page = Page::default();
        assert!(TypewriterRenderer::mount(&page, &TypewriterConfig::default()).is_none());
    }

    #[tokio::test]
    async fn observer_sees_every_step() {
        let (page, _) = page_with_text("a<br>");
        let mut seen = Vec::new();
        TypewriterRenderer::mount(&page, &TypewriterConfig::default())
            .unwrap()
            .run_with(&CountingScheduler::new(), |step| seen.push(step))
            .await;
        assert_eq!(seen, vec![Step::Char('a'), Step::LineBreak]);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_follow_the_tick() {
        let (page, el) = page_with_text("abc");
        let renderer = TypewriterRenderer::mount(&page, &TypewriterConfig::default()).unwrap();
        let handle = renderer.spawn(Arc::new(TokioScheduler));

        // The first unit is written before the first delay.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(page.text_content(el), "a");

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(page.text_content(el), "ab");

        let report = handle.await.unwrap();
        assert_eq!(report.ticks, 3);
        assert_eq!(page.text_content(el), "abc");
    }
}
