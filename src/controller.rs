use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::{
    config::RenderConfig,
    scene::{Axis, Scene, SceneCommand},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Scene(SceneCommand),
    SetRecursionDepth(i64),
}

/// Translates key presses into scene commands. Only sphere `target` moves.
pub struct SceneController {
    pub target: usize,
    pub step: f64,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new(0, 0.2)
    }
}

impl SceneController {
    pub fn new(target: usize, step: f64) -> Self {
        Self { target, step }
    }

    pub fn process_events(&self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Released,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => {
                let command = self.map_key(*keycode);
                if let Some(command) = &command {
                    tracing::info!(?keycode, ?command, "key release");
                }
                command
            }
            _ => None,
        }
    }

    pub fn map_key(&self, keycode: VirtualKeyCode) -> Option<Command> {
        let step = self.step;
        let movement = match keycode {
            VirtualKeyCode::W => (Axis::Y, step),
            VirtualKeyCode::S => (Axis::Y, -step),
            VirtualKeyCode::D => (Axis::X, step),
            VirtualKeyCode::A => (Axis::X, -step),
            VirtualKeyCode::PageUp => (Axis::Z, step),
            VirtualKeyCode::PageDown => (Axis::Z, -step),
            other => return depth_key(other).map(Command::SetRecursionDepth),
        };

        let (axis, delta) = movement;
        Some(Command::Scene(SceneCommand::MoveSphere {
            index: self.target,
            axis,
            delta,
        }))
    }
}

/// Applies `command` and returns whether the frame has to be redrawn.
///
/// A depth request that clamps to the current depth leaves everything as is.
/// A scene command that fails is logged and changes nothing.
pub fn apply_command(scene: &mut Scene, config: &mut RenderConfig, command: Command) -> bool {
    match command {
        Command::Scene(scene_command) => match scene.apply_command(scene_command) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "command ignored");
                false
            }
        },
        Command::SetRecursionDepth(depth) => {
            let requested = RenderConfig::new(depth);
            if requested == *config {
                return false;
            }
            *config = requested;
            true
        }
    }
}

fn depth_key(keycode: VirtualKeyCode) -> Option<i64> {
    let depth = match keycode {
        VirtualKeyCode::Key0 | VirtualKeyCode::Numpad0 => 0,
        VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => 1,
        VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => 2,
        VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => 3,
        VirtualKeyCode::Key4 | VirtualKeyCode::Numpad4 => 4,
        VirtualKeyCode::Key5 | VirtualKeyCode::Numpad5 => 5,
        _ => return None,
    };
    Some(depth)
}
