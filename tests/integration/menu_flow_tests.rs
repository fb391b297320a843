//! Menu flow through the whole machine.
//!
//! The real [`SettingsMenu`] drives the real input scanner here; only
//! hardware and persistence are mocked.  The unit tests cover the
//! editor's own mechanics — these cover the hand-off: idle opens it,
//! its exit applies and persists edits, and the firing path picks the
//! new values up.

use crate::mock_hw::{MockClock, MockHardware, MockNvs, NullDisplay, RecSink};
use sear::app::events::AppEvent;
use sear::app::ports::{MenuExit, TimePort};
use sear::app::service::FireControl;
use sear::config::FireSettings;
use sear::fsm::StateId;
use sear::input::ButtonId;
use sear::menu::SettingsMenu;

struct Rig {
    service: FireControl,
    hw: MockHardware,
    clock: MockClock,
    menu: SettingsMenu<NullDisplay>,
    nvs: MockNvs,
    sink: RecSink,
}

impl Rig {
    fn boot(settings: FireSettings) -> Self {
        let mut rig = Self {
            service: FireControl::new(settings),
            hw: MockHardware::new(),
            clock: MockClock::new(),
            menu: SettingsMenu::new(NullDisplay),
            nvs: MockNvs::new(),
            sink: RecSink::new(),
        };
        rig.hw.press(ButtonId::Magazine);
        rig.service.start(
            &mut rig.hw,
            &rig.clock,
            &mut rig.menu,
            &mut rig.nvs,
            &mut rig.sink,
        );
        rig.run(60);
        rig
    }

    fn run(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.service.tick(
                &mut self.hw,
                &self.clock,
                &mut self.menu,
                &mut self.nvs,
                &mut self.sink,
            );
            self.clock.delay_ms(1);
        }
    }

    fn run_until(&mut self, target: StateId, max_cycles: u32) -> bool {
        for _ in 0..max_cycles {
            if self.service.state() == target {
                return true;
            }
            self.run(1);
        }
        self.service.state() == target
    }

    fn tap(&mut self, id: ButtonId) {
        self.hw.press(id);
        self.run(40);
        self.hw.release(id);
        self.run(40);
    }
}

#[test]
fn edit_and_save_lands_in_the_settings_port() {
    let mut rig = Rig::boot(FireSettings::default());

    rig.tap(ButtonId::NavSelect); // open
    assert_eq!(rig.service.state(), StateId::Menu);
    rig.tap(ButtonId::NavRight); // dwell 25 -> 26
    rig.tap(ButtonId::NavSelect); // save and exit

    assert_eq!(rig.service.state(), StateId::Idle);
    assert_eq!(rig.service.settings().dwell_ms, 26);
    assert_eq!(rig.nvs.saves.len(), 1);
    assert_eq!(rig.nvs.saves[0].dwell_ms, 26);
    assert!(rig.sink.contains(&AppEvent::SettingsPersisted));
    assert!(rig.sink.contains(&AppEvent::MenuClosed(MenuExit::Saved)));
}

#[test]
fn save_with_no_edits_skips_the_port() {
    let mut rig = Rig::boot(FireSettings::default());

    rig.tap(ButtonId::NavSelect);
    rig.tap(ButtonId::NavSelect);

    assert_eq!(rig.service.state(), StateId::Idle);
    assert!(rig.nvs.saves.is_empty(), "nothing changed, nothing to write");
    assert!(rig.sink.contains(&AppEvent::MenuClosed(MenuExit::Unchanged)));
    assert!(!rig.sink.contains(&AppEvent::SettingsPersisted));
}

#[test]
fn toggle_edit_survives_the_round_trip() {
    let mut rig = Rig::boot(FireSettings::default());

    rig.tap(ButtonId::NavSelect);
    for _ in 0..6 {
        rig.tap(ButtonId::NavDown); // cursor to "Force reload"
    }
    rig.tap(ButtonId::NavRight); // OFF -> ON
    rig.tap(ButtonId::NavSelect);

    assert!(rig.service.settings().force_reload);
    assert_eq!(rig.nvs.saves.len(), 1);
    assert!(rig.nvs.saves[0].force_reload);
}

#[test]
fn new_dwell_shapes_the_next_string() {
    let mut rig = Rig::boot(FireSettings {
        dwell_ms: 10,
        shot_delay_ms: 20,
        ..FireSettings::default()
    });

    rig.tap(ButtonId::NavSelect);
    rig.tap(ButtonId::NavRight); // dwell 10 -> 11
    rig.tap(ButtonId::NavSelect);
    assert_eq!(rig.service.settings().dwell_ms, 11);

    rig.hw.press(ButtonId::Selector);
    rig.run(30);
    rig.hw.press(ButtonId::Trigger);
    assert!(rig.run_until(StateId::FullAuto, 40));

    let t0 = rig.clock.now_ms();
    rig.run(5);
    // Five shots at the edited dwell plus delay, plus loop pacing.
    assert_eq!(rig.clock.now_ms() - t0, 5 * (11 + 20 + 1));
}

#[test]
fn menu_reopens_only_on_a_fresh_select_press() {
    let mut rig = Rig::boot(FireSettings::default());

    rig.tap(ButtonId::NavSelect);
    rig.tap(ButtonId::NavSelect);
    assert_eq!(rig.service.state(), StateId::Idle);

    // Quiet loop: no reopen without a new press.
    rig.run(200);
    assert_eq!(rig.service.state(), StateId::Idle);

    rig.tap(ButtonId::NavSelect);
    assert_eq!(rig.service.state(), StateId::Menu);
}
