use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use tracing::warn;

use super::debounce::DebounceQueue;
use super::params::{ParamSet, QueryPatch, END_DATE, PAGE, SEARCH, SIZE, START_DATE};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A control owning a fixed slice of the query string.
pub trait FilterWidget {
    fn owned_keys(&self) -> &[&'static str];

    /// Strips anything outside the owned keys before it reaches the store.
    fn scoped(&self, mut patch: QueryPatch) -> QueryPatch {
        let dropped = patch.retain_keys(self.owned_keys());
        if !dropped.is_empty() {
            warn!(?dropped, owned = ?self.owned_keys(), "widget tried to write keys it does not own");
        }
        patch
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SwitchOption {
    pub link: &'static str,
    pub name: &'static str,
}

pub static PERIOD_OPTIONS: &[SwitchOption] = &[
    SwitchOption { link: "day", name: "Day" },
    SwitchOption { link: "week", name: "Week" },
    SwitchOption { link: "month", name: "Month" },
];

pub static SERVICE_TYPES: &[SwitchOption] = &[
    SwitchOption { link: "washing", name: "Washing" },
    SwitchOption { link: "detailing", name: "Detailing" },
];

/// Single-key switcher used for `tab`, `period` and `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSwitcher {
    key: &'static str,
    options: &'static [SwitchOption],
}

impl OptionSwitcher {
    pub const fn new(key: &'static str, options: &'static [SwitchOption]) -> Self {
        Self { key, options }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn options(&self) -> &'static [SwitchOption] {
        self.options
    }

    pub fn current(&self, params: &ParamSet) -> Option<&'static SwitchOption> {
        let value = params.get(self.key)?;
        self.options.iter().find(|option| option.link == value)
    }

    /// `None` when `link` is not one of the options.
    pub fn select(&self, link: &str) -> Option<QueryPatch> {
        let option = self.options.iter().find(|option| option.link == link)?;
        Some(self.scoped(QueryPatch::new().set(self.key, option.link)))
    }

    /// Moves to the option after the current one, wrapping at the end.
    pub fn cycle(&self, params: &ParamSet) -> Option<QueryPatch> {
        let position = params
            .get(self.key)
            .and_then(|value| self.options.iter().position(|option| option.link == value));
        let next = match position {
            Some(idx) => (idx + 1) % self.options.len(),
            None => 0,
        };
        self.options
            .get(next)
            .and_then(|option| self.select(option.link))
    }
}

impl FilterWidget for OptionSwitcher {
    fn owned_keys(&self) -> &[&'static str] {
        std::slice::from_ref(&self.key)
    }
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE).ok()
}

pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE)
        .unwrap_or_else(|_| date.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

/// Owns `start_date`/`end_date` and keeps them paired.
///
/// A lone endpoint commits as a single-day range.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateRangePicker;

impl DateRangePicker {
    /// Anything but two valid, ordered dates reads as "no range".
    pub fn read(&self, params: &ParamSet) -> Option<DateRange> {
        let start = parse_date(params.get(START_DATE)?)?;
        let end = parse_date(params.get(END_DATE)?)?;
        (start <= end).then_some(DateRange { start, end })
    }

    pub fn select(&self, start: Option<Date>, end: Option<Date>) -> QueryPatch {
        let range = match (start, end) {
            (Some(start), Some(end)) if end < start => Some((end, start)),
            (Some(start), Some(end)) => Some((start, end)),
            (Some(day), None) | (None, Some(day)) => Some((day, day)),
            (None, None) => None,
        };

        match range {
            Some((start, end)) => self.scoped(
                QueryPatch::new()
                    .set(START_DATE, format_date(start))
                    .set(END_DATE, format_date(end)),
            ),
            None => self.clear(),
        }
    }

    pub fn clear(&self) -> QueryPatch {
        self.scoped(QueryPatch::new().remove(START_DATE).remove(END_DATE))
    }
}

impl FilterWidget for DateRangePicker {
    fn owned_keys(&self) -> &[&'static str] {
        &[START_DATE, END_DATE]
    }
}

/// Owns `search`; keystrokes queue up and only the settled value is written.
#[derive(Clone, Debug)]
pub struct SearchBox {
    queue: DebounceQueue,
}

impl SearchBox {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            queue: DebounceQueue::new(quiet_ms),
        }
    }

    pub fn read(params: &ParamSet) -> String {
        params.get(SEARCH).unwrap_or_default().to_string()
    }

    /// Text the input should take after the committed term changed. `None`
    /// when the local text already trims to it, so a trailing space typed
    /// mid-word survives the write coming back.
    pub fn echo(local: &str, committed: &str) -> Option<String> {
        (local.trim() != committed).then(|| committed.to_string())
    }

    pub fn input(&mut self, text: &str, now_ms: u64) -> u64 {
        let value = text.trim();
        let value = (!value.is_empty()).then(|| value.to_string());
        self.queue.schedule(SEARCH, value, now_ms)
    }

    /// The write to commit once the quiet interval has passed, if any.
    pub fn due(&mut self, now_ms: u64) -> Option<QueryPatch> {
        let patch = self.queue.flush_due(now_ms);
        (!patch.is_empty()).then(|| self.scoped(patch))
    }

    /// Commits whatever is pending right away (Enter key, clear button).
    pub fn flush(&mut self) -> Option<QueryPatch> {
        let patch = self.queue.flush_all();
        (!patch.is_empty()).then(|| self.scoped(patch))
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.next_deadline()
    }
}

impl FilterWidget for SearchBox {
    fn owned_keys(&self) -> &[&'static str] {
        &[SEARCH]
    }
}

/// Owns `page`/`size`. A missing `page` means the first page.
#[derive(Clone, Copy, Debug)]
pub struct Pager {
    default_size: u32,
}

impl Pager {
    pub fn new(default_size: u32) -> Self {
        Self {
            default_size: default_size.max(1),
        }
    }

    pub fn page(&self, params: &ParamSet) -> u32 {
        params
            .get(PAGE)
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }

    pub fn size(&self, params: &ParamSet) -> u32 {
        params
            .get(SIZE)
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(self.default_size)
    }

    pub fn go_to(&self, page: u32) -> QueryPatch {
        let patch = if page <= 1 {
            QueryPatch::new().remove(PAGE)
        } else {
            QueryPatch::new().set(PAGE, page.to_string())
        };
        self.scoped(patch)
    }

    /// `(page, total)` as shown to the user. A narrowed result set can leave
    /// `page` past the end; the display clamps, the URL is left alone.
    pub fn position(&self, page: u32, total_pages: u64) -> (u64, u64) {
        let total = total_pages.max(1);
        (u64::from(page.max(1)).min(total), total)
    }

    /// A new page length starts over from the first page.
    pub fn resize(&self, size: u32) -> QueryPatch {
        let mut patch = if size == 0 || size == self.default_size {
            QueryPatch::new().remove(SIZE)
        } else {
            QueryPatch::new().set(SIZE, size.to_string())
        };
        patch.merge(self.go_to(1));
        self.scoped(patch)
    }
}

impl FilterWidget for Pager {
    fn owned_keys(&self) -> &[&'static str] {
        &[PAGE, SIZE]
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::query::params::{PERIOD, TAB, TYPE};

    fn owned_untouched(widget: &dyn FilterWidget, before: &ParamSet, patch: &QueryPatch) {
        let after = before.merged(patch);
        for (key, value) in before.iter() {
            if !widget.owned_keys().contains(&key) {
                assert_eq!(after.get(key), Some(value), "{key} changed");
            }
        }
        for key in patch.keys() {
            assert!(widget.owned_keys().contains(&key), "{key} not owned");
        }
    }

    #[test]
    fn switcher_writes_only_its_key() {
        let params = ParamSet::parse("tab=list&period=day&search=foam&start_date=2024-01-01&end_date=2024-01-03");
        let period = OptionSwitcher::new(PERIOD, PERIOD_OPTIONS);
        let patch = period.select("week").unwrap();

        owned_untouched(&period, &params, &patch);
        assert_eq!(params.merged(&patch).get(PERIOD), Some("week"));
        assert!(period.select("fortnight").is_none());
    }

    #[test]
    fn switcher_cycles_and_reports_current() {
        let types = OptionSwitcher::new(TYPE, SERVICE_TYPES);
        let params = ParamSet::parse("type=detailing");
        assert_eq!(types.current(&params).map(|option| option.name), Some("Detailing"));

        let next = params.merged(&types.cycle(&params).unwrap());
        assert_eq!(next.get(TYPE), Some("washing"));
        let first = types.cycle(&ParamSet::default()).unwrap();
        assert_eq!(ParamSet::default().merged(&first).get(TYPE), Some("washing"));
    }

    #[test]
    fn scoped_drops_foreign_keys() {
        let tabs = OptionSwitcher::new(TAB, PERIOD_OPTIONS);
        let patch = tabs.scoped(QueryPatch::new().set(TAB, "day").set(SEARCH, "x"));
        assert_eq!(patch.keys().collect::<Vec<_>>(), vec![TAB]);
    }

    #[test]
    fn lone_start_becomes_single_day_range() {
        let picker = DateRangePicker;
        let params = ParamSet::parse("tab=list&period=day");
        let patch = picker.select(Some(date!(2024 - 03 - 05)), None);
        owned_untouched(&picker, &params, &patch);

        let next = params.merged(&patch);
        assert_eq!(next.get(START_DATE), Some("2024-03-05"));
        assert_eq!(next.get(END_DATE), Some("2024-03-05"));

        let clear = picker.clear();
        owned_untouched(&picker, &next, &clear);
        let cleared = next.merged(&clear);
        assert!(!cleared.contains(START_DATE));
        assert!(!cleared.contains(END_DATE));
        assert_eq!(cleared.to_query_string(), "tab=list&period=day");
    }

    #[test]
    fn reversed_endpoints_are_ordered() {
        let picker = DateRangePicker;
        let next = ParamSet::default()
            .merged(&picker.select(Some(date!(2024 - 03 - 09)), Some(date!(2024 - 03 - 01))));
        assert_eq!(
            picker.read(&next),
            Some(DateRange {
                start: date!(2024 - 03 - 01),
                end: date!(2024 - 03 - 09)
            })
        );
    }

    #[test]
    fn malformed_ranges_read_as_none() {
        let picker = DateRangePicker;
        for raw in [
            "start_date=2024-01-01",
            "end_date=2024-01-01",
            "start_date=2024-01-01&end_date=garbage",
            "start_date=2024-02-01&end_date=2024-01-01",
        ] {
            assert_eq!(picker.read(&ParamSet::parse(raw)), None, "{raw}");
        }
    }

    #[test]
    fn search_box_writes_settled_value_only() {
        let mut search = SearchBox::new(300);
        search.input("f", 0);
        search.input("fo", 100);
        search.input("foam ", 200);

        assert_eq!(search.due(400), None);
        assert_eq!(search.next_deadline(), Some(500));
        let patch = search.due(500).unwrap();
        assert_eq!(patch, QueryPatch::new().set(SEARCH, "foam"));
        assert_eq!(search.due(900), None);
    }

    #[test]
    fn committed_term_does_not_eat_trailing_space() {
        let mut search = SearchBox::new(300);
        let typed = "foam ";
        search.input(typed, 0);
        let params = ParamSet::parse("tab=list").merged(&search.due(300).unwrap());
        let committed = SearchBox::read(&params);

        assert_eq!(committed, "foam");
        assert_eq!(SearchBox::echo(typed, &committed), None);
        assert_eq!(SearchBox::echo("foam", "wax"), Some("wax".to_string()));
        assert_eq!(SearchBox::echo("foam", ""), Some(String::new()));
    }

    #[test]
    fn search_round_trip_absent_value_absent() {
        let mut search = SearchBox::new(300);
        let mut params = ParamSet::parse("tab=list");

        search.input("abc", 0);
        params.apply(&search.flush().unwrap());
        assert_eq!(SearchBox::read(&params), "abc");

        search.input("   ", 10);
        params.apply(&search.flush().unwrap());
        assert!(!params.contains(SEARCH));
        assert_eq!(params.to_query_string(), "tab=list");
    }

    #[test]
    fn pager_defaults_and_resets_page_on_resize() {
        let pager = Pager::new(20);
        let params = ParamSet::parse("page=3&size=50&period=week");
        assert_eq!(pager.page(&params), 3);
        assert_eq!(pager.size(&params), 50);
        assert_eq!(pager.page(&ParamSet::parse("page=0")), 1);
        assert_eq!(pager.size(&ParamSet::default()), 20);

        let patch = pager.resize(20);
        owned_untouched(&pager, &params, &patch);
        assert_eq!(params.merged(&patch).to_query_string(), "period=week");
        assert_eq!(
            ParamSet::default().merged(&pager.go_to(4)).get(PAGE),
            Some("4")
        );
        owned_untouched(&pager, &params, &pager.go_to(1));
        assert!(!params.merged(&pager.go_to(1)).contains(PAGE));
    }

    #[test]
    fn pager_position_clamps_past_the_end() {
        let pager = Pager::new(20);
        assert_eq!(pager.position(5, 1), (1, 1));
        assert_eq!(pager.position(1, 0), (1, 1));
        assert_eq!(pager.position(3, 7), (3, 7));
        assert_eq!(pager.position(0, 7), (1, 7));
    }
}
