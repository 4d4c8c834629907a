//! In-memory store seeding helpers shared by the unit tests.

use rusqlite::params;

use crate::store::Database;

pub(crate) struct Fixture {
    pub db: Database,
}

impl Fixture {
    pub fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        db.init_schema().unwrap();
        Self { db }
    }

    fn exec(&self, sql: &str, params: impl rusqlite::Params) {
        self.db.connection().execute(sql, params).unwrap();
    }

    pub fn project(&self, uuid: &str, key: &str) {
        self.exec(
            "INSERT INTO projects(uuid, kee, name) VALUES (?1, ?2, ?3);",
            params![uuid, key, format!("{key} name")],
        );
    }

    pub fn branch(
        &self,
        project_uuid: &str,
        uuid: &str,
        key: &str,
        branch_type: &str,
        exclude_from_purge: bool,
    ) {
        self.exec(
            "INSERT INTO project_branches(\
                 uuid, project_uuid, kee, branch_type, exclude_from_purge) \
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![uuid, project_uuid, key, branch_type, exclude_from_purge],
        );
    }

    pub fn component(&self, branch_uuid: &str, uuid: &str, enabled: bool) {
        self.exec(
            "INSERT INTO components(uuid, kee, branch_uuid, qualifier, enabled) \
             VALUES (?1, ?2, ?3, 'FIL', ?4);",
            params![uuid, format!("{uuid}:key"), branch_uuid, enabled],
        );
    }

    pub fn analysis(&self, branch_uuid: &str, uuid: &str, processed: bool) {
        let status = if processed { "P" } else { "U" };
        self.exec(
            "INSERT INTO snapshots(uuid, root_component_uuid, status, created_at) \
             VALUES (?1, ?2, ?3, 1000);",
            params![uuid, branch_uuid, status],
        );
    }

    pub fn event(
        &self,
        uuid: &str,
        analysis_uuid: &str,
        component_uuid: &str,
        name: &str,
        category: &str,
    ) {
        self.exec(
            "INSERT INTO events(uuid, analysis_uuid, component_uuid, name, category, \
                                description, event_data, event_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, 2000, 3000);",
            params![uuid, analysis_uuid, component_uuid, name, category],
        );
    }

    pub fn event_with_details(&self, uuid: &str, analysis_uuid: &str, component_uuid: &str) {
        self.exec(
            "INSERT INTO events(uuid, analysis_uuid, component_uuid, name, category, \
                                description, event_data, event_date, created_at) \
             VALUES (?1, ?2, ?3, 'Red', 'Alert', 'Coverage < 80', '{\"x\":1}', 2000, 3000);",
            params![uuid, analysis_uuid, component_uuid],
        );
    }

    pub fn link(&self, uuid: &str, project_uuid: &str, link_type: &str, name: Option<&str>) {
        self.exec(
            "INSERT INTO project_links(uuid, project_uuid, link_type, name, href) \
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![uuid, project_uuid, link_type, name, format!("https://example.com/{uuid}")],
        );
    }

    pub fn metric(&self, uuid: &str, key: &str, enabled: bool) {
        self.exec(
            "INSERT INTO metrics(uuid, name, short_name, enabled) VALUES (?1, ?2, ?3, ?4);",
            params![uuid, key, format!("{key} label"), enabled],
        );
    }

    pub fn measure(
        &self,
        uuid: &str,
        analysis_uuid: &str,
        component_uuid: &str,
        metric_uuid: &str,
        value: Option<f64>,
    ) {
        self.exec(
            "INSERT INTO project_measures(uuid, analysis_uuid, component_uuid, metric_uuid, value) \
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![uuid, analysis_uuid, component_uuid, metric_uuid, value],
        );
    }

    pub fn measure_with_alert(
        &self,
        uuid: &str,
        analysis_uuid: &str,
        component_uuid: &str,
        metric_uuid: &str,
    ) {
        self.exec(
            "INSERT INTO project_measures(uuid, analysis_uuid, component_uuid, metric_uuid, \
                                          value, text_value, alert_status, alert_text) \
             VALUES (?1, ?2, ?3, ?4, NULL, 'OK', 'ERROR', 'Coverage is below 80');",
            params![uuid, analysis_uuid, component_uuid, metric_uuid],
        );
    }

    pub fn property(
        &self,
        uuid: &str,
        key: &str,
        entity_uuid: Option<&str>,
        user_uuid: Option<&str>,
        value: Option<&str>,
    ) {
        self.exec(
            "INSERT INTO properties(uuid, prop_key, entity_uuid, user_uuid, text_value) \
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![uuid, key, entity_uuid, user_uuid, value],
        );
    }

    pub fn new_code_period(
        &self,
        uuid: &str,
        project_uuid: &str,
        branch_uuid: Option<&str>,
        period_type: &str,
        value: Option<&str>,
    ) {
        self.exec(
            "INSERT INTO new_code_periods(uuid, project_uuid, branch_uuid, period_type, value) \
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![uuid, project_uuid, branch_uuid, period_type, value],
        );
    }

    /// Two projects, `P1` and `P2`, each with data of every kind. `P1` also
    /// carries rows every step must filter out.
    pub fn two_projects() -> Self {
        let fx = Self::new();

        fx.metric("M-ncloc", "ncloc", true);
        fx.metric("M-new-ncloc", "new_ncloc", true);
        fx.metric("M-old", "old_metric", false);
        fx.metric("M-coverage", "coverage", true);

        for p in ["P1", "P2"] {
            let main = format!("{p}-main");
            let root = format!("{p}-main-root");
            fx.project(p, &format!("{p}-key"));
            fx.branch(p, &main, "main", "MAIN", true);
            fx.component(&main, &root, true);
            fx.analysis(&main, &format!("{p}-A1"), true);
            fx.new_code_period(&format!("{p}-NCP"), p, None, "NUMBER_OF_DAYS", Some("30"));
        }

        // P1
        fx.branch("P1", "P1-feat", "feature/x", "BRANCH", false);
        fx.component("P1-main", "P1-file-1", false);
        fx.analysis("P1-main", "P1-A2", false);

        fx.event("E1", "P1-A1", "P1-main-root", "6.0", "VERSION");
        fx.event_with_details("E2", "P1-A2", "P1-main-root");

        fx.link("L1", "P1", "scm", Some("GitHub"));
        fx.link("L2", "P1", "custom", Some("homepage"));

        fx.measure("ME1", "P1-A1", "P1-main-root", "M-ncloc", Some(100.0));
        fx.measure("ME2", "P1-A1", "P1-main-root", "M-new-ncloc", Some(100.0));
        fx.measure("ME3", "P1-A1", "P1-file-1", "M-old", Some(5.0));
        fx.measure("ME4", "P1-A2", "P1-main-root", "M-coverage", Some(70.0));

        fx.property("S1", "sonar.exclusions", Some("P1"), None, Some("**/gen/**"));
        fx.property("S2", "sonar.issues.defaultAssigneeLogin", Some("P1"), None, Some("bob"));
        fx.property("S3", "sonar.empty", Some("P1"), None, None);
        fx.property("S4", "favourite", Some("P1"), Some("U1"), Some("true"));
        fx.property("S5", "sonar.core.serverBaseURL", None, None, Some("http://x"));

        fx.new_code_period("P1-NCP-main", "P1", Some("P1-main"), "PREVIOUS_VERSION", None);
        fx.new_code_period("P1-NCP-feat", "P1", Some("P1-feat"), "REFERENCE_BRANCH", Some("main"));

        // P2
        fx.event("E3", "P2-A1", "P2-main-root", "1.0", "VERSION");
        fx.link("L3", "P2", "custom", Some("wiki"));
        fx.measure("ME5", "P2-A1", "P2-main-root", "M-coverage", Some(80.0));
        fx.property("S6", "sonar.p2", Some("P2"), None, Some("x"));

        fx
    }
}
