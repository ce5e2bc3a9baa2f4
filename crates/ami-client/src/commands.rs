//! One method per named action on an authenticated [`Connection`].
//!
//! Each method builds the action with its [`Action`] constructor and sends it
//! through [`Connection::send_action`], returning the response block.

use std::fmt::Display;

use crate::action::Action;
use crate::block::Block;
use crate::catalog::Originate;
use crate::connection::Connection;
use crate::error::ClientError;
use crate::transport::Transport;

/// Result of a single request/response exchange.
pub type Reply = Result<Block, ClientError>;

impl<T: Transport> Connection<T> {
    /// Sends `AbsoluteTimeout`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn absolute_timeout(&mut self, channel: &str, timeout: impl Display) -> Reply {
        self.send_action(&Action::absolute_timeout(channel, timeout))
    }

    /// Sends `ChangeMonitor`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn change_monitor(&mut self, channel: &str, file: &str) -> Reply {
        self.send_action(&Action::change_monitor(channel, file))
    }

    /// Runs a CLI command. The output is in the reply's `data` field.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn command(&mut self, command: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::command(command, action_id))
    }

    /// Sends `Events` with the given mask.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn events(&mut self, event_mask: &str) -> Reply {
        self.send_action(&Action::events(event_mask))
    }

    /// Sends `ExtensionState`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn extension_state(&mut self, exten: &str, context: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::extension_state(exten, context, action_id))
    }

    /// Sends `GetVar`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn get_var(&mut self, channel: &str, variable: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::get_var(channel, variable, action_id))
    }

    /// Sends `Hangup`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn hangup(&mut self, channel: &str) -> Reply {
        self.send_action(&Action::hangup(channel))
    }

    /// Sends `IAXPeers`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn iax_peers(&mut self) -> Reply {
        self.send_action(&Action::iax_peers())
    }

    /// Sends `ListCommands`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn list_commands(&mut self, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::list_commands(action_id))
    }

    /// Sends `Logoff`. The manager closes the socket afterwards, so the next
    /// wait on this connection reports a closed transport; prefer
    /// [`Connection::disconnect`] to end a session.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn logoff(&mut self) -> Reply {
        self.send_action(&Action::logoff())
    }

    /// Sends `MailboxCount`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn mailbox_count(&mut self, mailbox: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::mailbox_count(mailbox, action_id))
    }

    /// Sends `MailboxStatus`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn mailbox_status(&mut self, mailbox: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::mailbox_status(mailbox, action_id))
    }

    /// Sends `Monitor`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn monitor(
        &mut self,
        channel: &str,
        file: Option<&str>,
        format: Option<&str>,
        mix: Option<bool>,
    ) -> Reply {
        self.send_action(&Action::monitor(channel, file, format, mix))
    }

    /// Sends `Originate`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn originate(&mut self, channel: &str, options: &Originate) -> Reply {
        self.send_action(&Action::originate(channel, options))
    }

    /// Sends `ParkedCalls`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn parked_calls(&mut self, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::parked_calls(action_id))
    }

    /// Sends `Ping`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn ping(&mut self) -> Reply {
        self.send_action(&Action::ping())
    }

    /// Sends `QueueAdd`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn queue_add(&mut self, queue: &str, interface: &str, penalty: u32) -> Reply {
        self.send_action(&Action::queue_add(queue, interface, penalty))
    }

    /// Sends `QueueRemove`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn queue_remove(&mut self, queue: &str, interface: &str) -> Reply {
        self.send_action(&Action::queue_remove(queue, interface))
    }

    /// Sends `Queues`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn queues(&mut self) -> Reply {
        self.send_action(&Action::queues())
    }

    /// Sends `QueueStatus`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn queue_status(&mut self, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::queue_status(action_id))
    }

    /// Sends `Redirect`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn redirect(
        &mut self,
        channel: &str,
        extra_channel: &str,
        exten: &str,
        context: &str,
        priority: &str,
    ) -> Reply {
        self.send_action(&Action::redirect(
            channel,
            extra_channel,
            exten,
            context,
            priority,
        ))
    }

    /// Sends `SetCDRUserField`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn set_cdr_user_field(
        &mut self,
        user_field: &str,
        channel: &str,
        append: Option<&str>,
    ) -> Reply {
        self.send_action(&Action::set_cdr_user_field(user_field, channel, append))
    }

    /// Sends `SetVar`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn set_var(&mut self, channel: &str, variable: &str, value: &str) -> Reply {
        self.send_action(&Action::set_var(channel, variable, value))
    }

    /// Sends `Status`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn status(&mut self, channel: &str, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::status(channel, action_id))
    }

    /// Sends `StopMonitor`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn stop_monitor(&mut self, channel: &str) -> Reply {
        self.send_action(&Action::stop_monitor(channel))
    }

    /// Sends `ZapDialOffhook`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_dial_offhook(&mut self, zap_channel: &str, number: impl Display) -> Reply {
        self.send_action(&Action::zap_dial_offhook(zap_channel, number))
    }

    /// Sends `ZapDNDoff`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_dnd_off(&mut self, zap_channel: &str) -> Reply {
        self.send_action(&Action::zap_dnd_off(zap_channel))
    }

    /// Sends `ZapDNDon`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_dnd_on(&mut self, zap_channel: &str) -> Reply {
        self.send_action(&Action::zap_dnd_on(zap_channel))
    }

    /// Sends `ZapHangup`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_hangup(&mut self, zap_channel: &str) -> Reply {
        self.send_action(&Action::zap_hangup(zap_channel))
    }

    /// Sends `ZapTransfer`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_transfer(&mut self, zap_channel: &str) -> Reply {
        self.send_action(&Action::zap_transfer(zap_channel))
    }

    /// Sends `ZapShowChannels`.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_action`].
    pub fn zap_show_channels(&mut self, action_id: Option<&str>) -> Reply {
        self.send_action(&Action::zap_show_channels(action_id))
    }
}
