//! Picks the strategy that expresses a proposed change and falls through to
//! the next one whenever a strategy declines or fails.
//!
//! One pass per change request, terminal on the first fragment built:
//!
//! 1. An identical proposal is an unchanged fragment.
//! 2. A proposal that only adds emphasis becomes `FormatOnly`, whatever its
//!    block structure; unchanged text is never redlined.
//! 3. A list proposal becomes a `ListFragment`, a table a `TableFragment`.
//! 4. Other block markup (headings, several paragraphs) is replaced whole.
//! 5. Everything else is word diffed into a `TextPatch`.
//! 6. `FullTextReplace` catches whatever is left.
//!
//! Anchors that cannot take structural markup (cells of nested tables) get
//! their structural proposals flattened for the host's native text APIs.
//! Empty anchors skip the diff: there is nothing to redline word by word.

use log::{debug, trace, warn};

use crate::{
    errors::ReconcileError,
    fragment::{
        FragmentPayload, build, describe_record, native::format_instructions, options::BuildOptions,
    },
    markdown::{
        blocks::has_block_markup,
        classifier::{FormattingClassification, classify},
        emphasis::parse_inline,
        preprocess::preprocess,
    },
    policy::ReconcilePolicy,
    structure::{list_parser::parse_list, table_parser::parse_table},
    types::{
        change_request::ChangeRequest,
        fragment::{Fragment, Strategy},
    },
    word_diff::diff,
};

/// Outcome of one strategy attempt.
type Attempt = Result<Fragment, ReconcileError>;

/// A strategy attempt, `None` when the strategy does not apply at all.
type Step<'r> = fn(&Router<'r>) -> Option<Attempt>;

#[derive(Debug)]
struct Router<'r> {
    request: &'r ChangeRequest,
    options: &'r BuildOptions,
    policy: &'r ReconcilePolicy,
}

impl<'r> Router<'r> {
    fn original(&self) -> &str { &self.request.original_text }

    fn proposed(&self) -> &str { &self.request.proposed_content }

    fn build(&self, payload: FragmentPayload<'_>) -> Attempt {
        let strategy = payload.strategy();
        debug!("[{}] Trying {strategy}", self.request.anchor_id);

        build(payload, &self.request.context, self.options, self.policy)
    }

    /// Returns the first fragment a strategy manages to build, logging every
    /// failure on the way.
    fn first_success(&self, steps: &[Step<'r>]) -> Option<Fragment> {
        for step in steps {
            match step(self) {
                Some(Ok(fragment)) => return Some(fragment),
                Some(Err(error)) => debug!("[{}] Falling through: {error}", self.request.anchor_id),
                None => {}
            }
        }

        None
    }

    fn try_list(&self) -> Option<Attempt> {
        let model = parse_list(self.proposed(), self.policy)?;
        trace!("Proposal parses as a list of {} items", model.len());

        Some(self.build(FragmentPayload::List {
            original: self.original(),
            model: &model,
        }))
    }

    fn try_table(&self) -> Option<Attempt> {
        let model = parse_table(self.proposed())?;
        trace!("Proposal parses as a {}x{} table", model.num_rows, model.num_cols);

        Some(self.build(FragmentPayload::Table {
            original: self.original(),
            model: &model,
        }))
    }

    /// Styled text for an empty anchor: the stripped proposal is "already
    /// there" and only needs its emphasis applied.
    fn try_styled_insert(&self) -> Option<Attempt> {
        let parsed = parse_inline(self.proposed());
        if !parsed.has_formatting() || has_block_markup(self.proposed()) {
            return None;
        }

        let classification = FormattingClassification {
            is_formatting_only: true,
            spans: parsed.spans,
            clean_text: parsed.text,
        };

        Some(self.build(FragmentPayload::FormatOnly {
            original: &classification.clean_text,
            classification: &classification,
        }))
    }

    fn try_full_text(&self) -> Option<Attempt> {
        Some(self.build(FragmentPayload::FullText {
            original: self.original(),
            proposed: self.proposed(),
        }))
    }

    fn try_block_replace(&self) -> Option<Attempt> {
        if !has_block_markup(self.proposed()) {
            return None;
        }

        trace!("Proposal contains block markup");
        self.try_full_text()
    }

    /// Emphasis-only proposals, and whitespace-only ones which need no change
    /// at all. Re-indented or re-split structure is left to the structural
    /// strategies.
    fn try_format_only(&self) -> Option<Attempt> {
        let classification = classify(self.original(), self.proposed());
        if !classification.is_formatting_only {
            return None;
        }

        if classification.spans.is_empty() {
            if self.is_structural() {
                return None;
            }

            debug!("[{}] Only whitespace differs", self.request.anchor_id);
            return Some(Ok(Fragment::unchanged()));
        }

        Some(self.build(FragmentPayload::FormatOnly {
            original: self.original(),
            classification: &classification,
        }))
    }

    fn try_text_patch(&self) -> Option<Attempt> {
        let proposed = parse_inline(self.proposed());
        let records = diff(self.original(), &proposed.text, self.policy);

        for record in &records {
            debug!("[{}] {}", self.request.anchor_id, describe_record(self.original(), record));
        }

        Some(self.build(FragmentPayload::TextPatch {
            original: self.original(),
            proposed: &proposed,
            records: &records,
        }))
    }

    /// Plain text plus formatting for anchors that only accept text.
    fn native_fallback(&self) -> Fragment {
        let flattened = preprocess(self.proposed(), self.policy);
        debug!(
            "[{}] Anchor cannot take structural markup, falling back to native text",
            self.request.anchor_id
        );

        Fragment {
            has_changes: true,
            strategy_used: Some(Strategy::FullTextReplace),
            uses_native_api_fallback: true,
            native_instructions: format_instructions(
                &flattened.clean_text,
                &flattened.format_hints,
                self.policy.max_search_len,
            ),
            records: diff(self.original(), &flattened.clean_text, self.policy),
            plain_text: Some(flattened.clean_text),
            format_hints: flattened.format_hints,
            ..Fragment::unchanged()
        }
    }

    fn is_structural(&self) -> bool {
        parse_list(self.proposed(), self.policy).is_some()
            || parse_table(self.proposed()).is_some()
            || has_block_markup(self.proposed())
    }

    fn route(&self) -> Fragment {
        if self.original() == self.proposed() {
            debug!("[{}] Proposal is identical to the original", self.request.anchor_id);
            return Fragment::unchanged();
        }

        if !self.request.context.accepts_structural_markup() && self.is_structural() {
            return self.native_fallback();
        }

        let empty_anchor: [Step<'r>; 4] = [
            Self::try_list,
            Self::try_table,
            Self::try_styled_insert,
            Self::try_full_text,
        ];
        let existing_text: [Step<'r>; 6] = [
            Self::try_format_only,
            Self::try_list,
            Self::try_table,
            Self::try_block_replace,
            Self::try_text_patch,
            Self::try_full_text,
        ];

        let steps: &[Step<'r>] = if self.original().trim().is_empty() {
            &empty_anchor
        } else {
            &existing_text
        };

        self.first_success(steps).unwrap_or_else(|| {
            warn!("[{}] Every strategy failed, leaving the anchor untouched", self.request.anchor_id);
            Fragment::unchanged()
        })
    }
}

/// Reconciles one proposed change into a fragment.
///
/// Never fails: strategies that cannot express the change fall through to
/// the next one, and a request no strategy can handle yields a fragment
/// with `has_changes == false`.
///
/// ```
/// use redline_text::{BuildOptions, ChangeRequest, ReconcilePolicy, Strategy, reconcile_change};
///
/// let request = ChangeRequest::new("p1", "The NROFR clause applies.", "The ROFN clause applies.");
/// let fragment = reconcile_change(&request, &BuildOptions::default(), &ReconcilePolicy::default());
///
/// assert_eq!(fragment.strategy_used, Some(Strategy::TextPatch));
/// assert_eq!(fragment.records.len(), 1);
/// ```
#[must_use]
pub fn reconcile_change(request: &ChangeRequest, options: &BuildOptions, policy: &ReconcilePolicy) -> Fragment {
    if let Some(instruction) = &request.instruction {
        trace!("[{}] Reconciling change for: {instruction}", request.anchor_id);
    }

    Router {
        request,
        options,
        policy,
    }
    .route()
}

/// A policy and build options shared by a batch of change requests.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    pub policy: ReconcilePolicy,
    pub options: BuildOptions,
}

impl Reconciler {
    #[must_use]
    pub fn new(policy: ReconcilePolicy, options: BuildOptions) -> Self { Self { policy, options } }

    #[must_use]
    pub fn reconcile(&self, request: &ChangeRequest) -> Fragment {
        reconcile_change(request, &self.options, &self.policy)
    }

    /// Reconciles every request on its own; one request's fallbacks never
    /// affect another's.
    pub fn reconcile_all<'a>(
        &'a self,
        requests: impl IntoIterator<Item = &'a ChangeRequest> + 'a,
    ) -> impl Iterator<Item = Fragment> + 'a {
        requests.into_iter().map(|request| self.reconcile(request))
    }
}
