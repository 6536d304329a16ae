#[cfg(test)]
mod tests {
    use std::mem;
    use std::net::{TcpListener, TcpStream};
    use std::os::fd::{AsRawFd, RawFd};
    use std::time::Duration;

    use libc::{
        IPPROTO_TCP, SO_KEEPALIVE, SOL_SOCKET, TCP_KEEPCNT, TCP_KEEPIDLE, TCP_KEEPINTVL, c_int,
        socklen_t,
    };
    use vinculum::net::options::{
        KEEPALIVE_IDLE, KEEPALIVE_INTERVAL, KEEPALIVE_PROBES, RECV_TIMEOUT, SEND_TIMEOUT,
        set_keepalive, set_nodelay, set_nonblocking, set_rcv_timeout, set_snd_timeout,
    };

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");

        let client = TcpStream::connect(addr).expect("Failed to connect");
        let (server, _) = listener.accept().expect("Failed to accept");

        (client, server)
    }

    fn read_int_opt(fd: RawFd, level: c_int, name: c_int) -> c_int {
        let mut value: c_int = 0;
        let mut len = mem::size_of::<c_int>() as socklen_t;

        let rc = unsafe {
            libc::getsockopt(
                fd,
                level,
                name,
                &mut value as *mut c_int as *mut libc::c_void,
                &mut len,
            )
        };
        assert_eq!(rc, 0, "getsockopt failed");

        value
    }

    #[test]
    fn test_timeouts_land_on_the_socket() {
        let (client, _server) = connected_pair();

        set_snd_timeout(client.as_raw_fd()).expect("Failed to set send timeout");
        set_rcv_timeout(client.as_raw_fd()).expect("Failed to set recv timeout");

        let send = client.write_timeout().expect("Failed to read send timeout");
        let recv = client.read_timeout().expect("Failed to read recv timeout");
        assert_eq!(send, Some(SEND_TIMEOUT));
        assert_eq!(recv, Some(RECV_TIMEOUT));

        assert_eq!(SEND_TIMEOUT, Duration::from_secs(5));
        assert_eq!(RECV_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_nodelay_lands_on_the_socket() {
        let (client, _server) = connected_pair();

        set_nodelay(client.as_raw_fd()).expect("Failed to set nodelay");

        assert!(client.nodelay().expect("Failed to read nodelay"));
    }

    #[test]
    fn test_keepalive_tuning_lands_on_the_socket() {
        let (client, _server) = connected_pair();
        let fd = client.as_raw_fd();

        set_keepalive(fd).expect("Failed to set keepalive");

        assert_ne!(read_int_opt(fd, SOL_SOCKET, SO_KEEPALIVE), 0);
        assert_eq!(read_int_opt(fd, IPPROTO_TCP, TCP_KEEPIDLE), KEEPALIVE_IDLE);
        assert_eq!(
            read_int_opt(fd, IPPROTO_TCP, TCP_KEEPINTVL),
            KEEPALIVE_INTERVAL
        );
        assert_eq!(read_int_opt(fd, IPPROTO_TCP, TCP_KEEPCNT), KEEPALIVE_PROBES);
    }

    #[test]
    fn test_set_nonblocking_flags_the_descriptor() {
        let (client, _server) = connected_pair();
        let fd = client.as_raw_fd();

        set_nonblocking(fd).expect("Failed to set non-blocking");

        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        assert!(flags >= 0, "fcntl failed");
        assert_ne!(flags & libc::O_NONBLOCK, 0);
    }

    #[test]
    fn test_set_nonblocking_rejects_bad_descriptor() {
        assert!(set_nonblocking(-1).is_err());
    }
}
